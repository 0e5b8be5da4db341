mod ids;
mod lesson;
mod progress;
mod provider_settings;
mod quiz;

pub use ids::CardName;
pub use lesson::{LessonContent, LessonShapeError, QuizQuestion};
pub use progress::{CompletionSet, ProgressSummary};
pub use provider_settings::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, PLACEHOLDER_API_KEY, ProviderSettings,
    ProviderSettingsDraft, ProviderSettingsError,
};
pub use quiz::{QuizAttempt, QuizError, QuizResult, grade};
