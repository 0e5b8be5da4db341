use async_trait::async_trait;

use crate::error::ProviderError;
use crate::lesson::request::GenerationRequest;

/// External service that turns a generation request into raw response text.
#[async_trait]
pub trait LessonProvider: Send + Sync {
    /// Run one generation.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` for transport failures, non-success statuses,
    /// or responses without any text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}
