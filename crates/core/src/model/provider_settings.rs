use thiserror::Error;
use url::Url;

/// Placeholder shipped in sample configuration; treated as "no key".
pub const PLACEHOLDER_API_KEY: &str = "TU_API_KEY_AQUI";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for the lesson content provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSettings {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct ProviderSettingsDraft {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderSettingsError {
    #[error("invalid base URL")]
    InvalidBaseUrl,
    #[error("timeout must be at least one second")]
    InvalidTimeout,
}

impl ProviderSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft into usable settings.
    ///
    /// A blank or placeholder key is kept out of the settings so the client
    /// reports itself as not configured.
    ///
    /// # Errors
    ///
    /// Returns `ProviderSettingsError` if the base URL is present but invalid,
    /// or the timeout is zero.
    pub fn validate(self) -> Result<ProviderSettings, ProviderSettingsError> {
        let api_key = normalize_optional(self.api_key).filter(|key| key != PLACEHOLDER_API_KEY);
        let model = normalize_optional(self.model).unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url =
            normalize_optional(self.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        if Url::parse(&base_url).is_err() {
            return Err(ProviderSettingsError::InvalidBaseUrl);
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ProviderSettingsError::InvalidTimeout);
        }

        Ok(ProviderSettings {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}

impl ProviderSettings {
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_values() {
        let settings = ProviderSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, ProviderSettings::default());
        assert!(!settings.is_configured());
    }

    #[test]
    fn placeholder_and_blank_keys_are_not_configured() {
        for key in [PLACEHOLDER_API_KEY, "   ", ""] {
            let settings = ProviderSettingsDraft {
                api_key: Some(key.to_string()),
                ..ProviderSettingsDraft::default()
            }
            .validate()
            .unwrap();
            assert!(!settings.is_configured(), "key {key:?}");
        }
    }

    #[test]
    fn trims_key_and_base_url() {
        let settings = ProviderSettingsDraft {
            api_key: Some("  secret ".into()),
            base_url: Some("http://localhost:8080/v1beta/".into()),
            ..ProviderSettingsDraft::default()
        }
        .validate()
        .unwrap();
        assert_eq!(settings.api_key(), Some("secret"));
        assert_eq!(settings.base_url(), "http://localhost:8080/v1beta");
    }

    #[test]
    fn rejects_bad_url_and_zero_timeout() {
        let bad_url = ProviderSettingsDraft {
            base_url: Some("not a url".into()),
            ..ProviderSettingsDraft::default()
        };
        assert!(matches!(
            bad_url.validate(),
            Err(ProviderSettingsError::InvalidBaseUrl)
        ));

        let zero = ProviderSettingsDraft {
            timeout_secs: Some(0),
            ..ProviderSettingsDraft::default()
        };
        assert!(matches!(
            zero.validate(),
            Err(ProviderSettingsError::InvalidTimeout)
        ));
    }
}
