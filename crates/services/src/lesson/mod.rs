//! Lesson content acquisition.
//!
//! `LessonClient` owns the contract with the external generator: it builds
//! the request, enforces a timeout, and turns raw response text into a
//! validated `LessonContent` or a `LessonError`.

mod gemini;
mod provider;
mod request;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tarot_core::model::{
    CardName, LessonContent, ProviderSettings, ProviderSettingsDraft, ProviderSettingsError,
};

use crate::error::{LessonError, ProviderError};

pub use gemini::GeminiProvider;
pub use provider::LessonProvider;
pub use request::{GenerationRequest, SYSTEM_INSTRUCTION, lesson_schema};

/// Shown instead of lessons while no API key is configured.
pub const SETUP_INSTRUCTIONS: &str = "\
Configuración requerida

Para que esta aplicación funcione, necesitas una clave de API de Google Gemini.

1. Ve a Google AI Studio (https://aistudio.google.com/app/apikey) y crea una nueva clave de API.
2. Exporta la variable de entorno TAROT_AI_API_KEY con esa clave.
3. Vuelve a iniciar la aplicación.";

/// Read provider settings from `TAROT_AI_*` environment variables.
///
/// # Errors
///
/// Returns `ProviderSettingsError` if `TAROT_AI_BASE_URL` is not a valid URL
/// or the timeout is zero.
pub fn settings_from_env() -> Result<ProviderSettings, ProviderSettingsError> {
    let timeout_secs = match env::var("TAROT_AI_TIMEOUT_SECS") {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring unparseable TAROT_AI_TIMEOUT_SECS");
                None
            }
        },
        Err(_) => None,
    };

    ProviderSettingsDraft {
        api_key: env::var("TAROT_AI_API_KEY").ok(),
        model: env::var("TAROT_AI_MODEL").ok(),
        base_url: env::var("TAROT_AI_BASE_URL").ok(),
        timeout_secs,
    }
    .validate()
}

#[derive(Clone)]
pub struct LessonClient {
    settings: ProviderSettings,
    provider: Arc<dyn LessonProvider>,
}

impl LessonClient {
    #[must_use]
    pub fn new(settings: ProviderSettings, provider: Arc<dyn LessonProvider>) -> Self {
        Self { settings, provider }
    }

    /// Client talking to Gemini with the given settings.
    #[must_use]
    pub fn gemini(settings: ProviderSettings) -> Self {
        let provider: Arc<dyn LessonProvider> = Arc::new(GeminiProvider::new(&settings));
        Self::new(settings, provider)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.settings.is_configured()
    }

    /// Generate and validate the lesson for `card`.
    ///
    /// Makes a single attempt; callers retry by calling again.
    ///
    /// # Errors
    ///
    /// - `NotConfigured` if no API key is set (the provider is never called).
    /// - `GenerationFailed` on transport or provider failures, including timeouts.
    /// - `MalformedResponse` if the response text is not JSON.
    /// - `InvalidShape` if the JSON lacks a name or quiz, has mistyped fields,
    ///   or a quiz answer that is not among its options.
    pub async fn fetch_lesson(&self, card: &CardName) -> Result<LessonContent, LessonError> {
        if !self.is_configured() {
            return Err(LessonError::NotConfigured);
        }

        let request = GenerationRequest::for_card(card);
        let secs = self.settings.timeout_secs();
        tracing::debug!(card = %card, model = self.settings.model(), "requesting lesson");

        let generated =
            tokio::time::timeout(Duration::from_secs(secs), self.provider.generate(&request))
                .await
                .unwrap_or(Err(ProviderError::Timeout { secs }));

        let raw = match generated {
            Ok(raw) => raw,
            Err(cause) => {
                tracing::error!(card = %card, error = %cause, "lesson generation failed");
                return Err(cause.into());
            }
        };

        let lesson = parse_lesson(&raw).inspect_err(|err| {
            tracing::error!(card = %card, error = %err, "rejected lesson response");
        })?;

        if !lesson.echoes(card) {
            tracing::warn!(card = %card, returned = %lesson.name, "lesson name does not match requested card");
        }
        let blank = lesson.blank_fields();
        if !blank.is_empty() {
            tracing::warn!(card = %card, fields = ?blank, "lesson has blank fields");
        }

        Ok(lesson)
    }
}

/// Parse and validate raw response text.
fn parse_lesson(raw: &str) -> Result<LessonContent, LessonError> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(LessonError::MalformedResponse)?;
    if !value.is_object() {
        return Err(LessonError::InvalidShape {
            reason: "response is not a JSON object".into(),
        });
    }
    let lesson: LessonContent =
        serde_json::from_value(value).map_err(|err| LessonError::InvalidShape {
            reason: err.to_string(),
        })?;
    lesson.check_shape()?;
    Ok(lesson)
}
