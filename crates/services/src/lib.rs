#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson;
pub mod progress_service;
pub mod study_session;

pub use app_services::AppServices;
pub use error::{AppServicesError, LessonError, ProviderError, SessionError};
pub use lesson::{
    GeminiProvider, GenerationRequest, LessonClient, LessonProvider, SETUP_INSTRUCTIONS,
    settings_from_env,
};
pub use progress_service::{PROGRESS_KEY, ProgressLoad, ProgressStore};
pub use study_session::{LessonSlot, LessonTicket, StudySession};
