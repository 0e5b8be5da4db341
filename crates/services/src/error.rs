//! Shared error types for the services crate.

use thiserror::Error;

use storage::sqlite::SqliteInitError;
use tarot_core::NavigationError;
use tarot_core::model::{LessonShapeError, QuizError};

/// Detailed cause of a failed provider call. Kept for logging; callers see
/// it only as the source of `LessonError::GenerationFailed`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("provider request failed with status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("provider refused the prompt: {0}")]
    Blocked(String),
    #[error("provider did not answer within {secs}s")]
    Timeout { secs: u64 },
}

/// Errors emitted by `LessonClient::fetch_lesson`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson provider is not configured")]
    NotConfigured,
    #[error("lesson response is not valid JSON: {0}")]
    MalformedResponse(#[source] serde_json::Error),
    #[error("lesson response has an invalid shape: {reason}")]
    InvalidShape { reason: String },
    #[error("{message}")]
    GenerationFailed {
        message: String,
        #[source]
        cause: ProviderError,
    },
}

impl LessonError {
    /// True when the user has to configure a credential before retrying.
    #[must_use]
    pub fn needs_setup(&self) -> bool {
        matches!(self, Self::NotConfigured)
    }

    /// Text for the learner. Everything but `NotConfigured` reads the same.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        if self.needs_setup() {
            "Configura tu clave de API para generar lecciones."
        } else {
            "No se pudo cargar el contenido. Inténtalo de nuevo más tarde."
        }
    }
}

impl From<LessonShapeError> for LessonError {
    fn from(err: LessonShapeError) -> Self {
        Self::InvalidShape {
            reason: err.to_string(),
        }
    }
}

impl From<ProviderError> for LessonError {
    fn from(cause: ProviderError) -> Self {
        Self::GenerationFailed {
            message: "failed to generate card content from the AI service".into(),
            cause,
        }
    }
}

/// Errors emitted by `StudySession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no lesson is loaded for the selected card")]
    NoLesson,
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_not_configured_needs_setup() {
        assert!(LessonError::NotConfigured.needs_setup());
        let shape = LessonError::from(LessonShapeError::EmptyQuiz);
        assert!(!shape.needs_setup());
        let failed = LessonError::from(ProviderError::EmptyResponse);
        assert!(!failed.needs_setup());
        assert_eq!(shape.user_message(), failed.user_message());
        assert_ne!(
            LessonError::NotConfigured.user_message(),
            failed.user_message()
        );
    }

    #[test]
    fn generation_failed_keeps_cause_as_source() {
        let err = LessonError::from(ProviderError::Timeout { secs: 5 });
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("provider did not answer within 5s"));
    }
}
