use std::sync::Arc;

use storage::repository::Storage;
use tarot_core::model::ProviderSettings;

use crate::error::AppServicesError;
use crate::lesson::LessonClient;
use crate::progress_service::ProgressStore;
use crate::study_session::StudySession;

/// Assembles app-facing services.
#[derive(Clone)]
pub struct AppServices {
    lessons: Arc<LessonClient>,
    progress: Arc<ProgressStore>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the Gemini provider.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        settings: ProviderSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_parts(&storage, LessonClient::gemini(settings)))
    }

    #[must_use]
    pub fn from_parts(storage: &Storage, lessons: LessonClient) -> Self {
        Self {
            lessons: Arc::new(lessons),
            progress: Arc::new(ProgressStore::new(Arc::clone(&storage.kv))),
        }
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonClient> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressStore> {
        Arc::clone(&self.progress)
    }

    /// Start a study session with progress loaded from storage.
    pub async fn start_session(&self) -> StudySession {
        StudySession::start(self.lessons(), self.progress()).await
    }
}
