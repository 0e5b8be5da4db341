//! Session state for browsing cards, loading lessons, and taking quizzes.
//!
//! Every lesson request is keyed by a `LessonTicket`. Only the most recently
//! issued ticket can fill the lesson slot, so a response that arrives after
//! the learner has moved on is dropped instead of overwriting the newer card.

use std::sync::Arc;

use tarot_core::model::{CardName, CompletionSet, LessonContent, QuizAttempt, QuizResult};
use tarot_core::{Arcana, NavigationState, Screen};

use crate::error::{LessonError, SessionError};
use crate::lesson::LessonClient;
use crate::progress_service::ProgressStore;

/// Key for one in-flight lesson request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonTicket {
    card: CardName,
    seq: u64,
}

impl LessonTicket {
    #[must_use]
    pub fn card(&self) -> &CardName {
        &self.card
    }
}

/// Lesson state for the card on the detail screen.
#[derive(Debug)]
pub enum LessonSlot {
    Idle,
    Loading {
        ticket: LessonTicket,
    },
    Ready {
        card: CardName,
        lesson: LessonContent,
        attempt: QuizAttempt,
    },
    Failed {
        card: CardName,
        error: LessonError,
    },
}

impl LessonSlot {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The card this slot belongs to, if any.
    #[must_use]
    pub fn card(&self) -> Option<&CardName> {
        match self {
            Self::Idle => None,
            Self::Loading { ticket } => Some(&ticket.card),
            Self::Ready { card, .. } | Self::Failed { card, .. } => Some(card),
        }
    }
}

pub struct StudySession {
    lessons: Arc<LessonClient>,
    progress: Arc<ProgressStore>,
    nav: NavigationState,
    completed: CompletionSet,
    slot: LessonSlot,
    next_seq: u64,
}

impl StudySession {
    #[must_use]
    pub fn new(
        lessons: Arc<LessonClient>,
        progress: Arc<ProgressStore>,
        completed: CompletionSet,
    ) -> Self {
        Self {
            lessons,
            progress,
            nav: NavigationState::new(),
            completed,
            slot: LessonSlot::Idle,
            next_seq: 0,
        }
    }

    /// Start on the home screen with progress loaded from storage.
    pub async fn start(lessons: Arc<LessonClient>, progress: Arc<ProgressStore>) -> Self {
        let completed = progress.load().await;
        Self::new(lessons, progress, completed)
    }

    #[must_use]
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    #[must_use]
    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    #[must_use]
    pub fn slot(&self) -> &LessonSlot {
        &self.slot
    }

    #[must_use]
    pub fn is_complete(&self, card: &CardName) -> bool {
        ProgressStore::is_complete(&self.completed, card)
    }

    #[must_use]
    pub fn lessons_configured(&self) -> bool {
        self.lessons.is_configured()
    }

    /// # Errors
    ///
    /// Returns `SessionError::Navigation` unless on the home screen.
    pub fn select_category(&mut self, category: Arcana) -> Result<(), SessionError> {
        self.nav = self.nav.select_category(category)?;
        Ok(())
    }

    /// Open the detail screen for `card`.
    ///
    /// Returns the ticket to fetch with, or `None` when that card's lesson is
    /// already loading or loaded.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Navigation` from the home screen.
    pub fn select_card(&mut self, card: CardName) -> Result<Option<LessonTicket>, SessionError> {
        let already_open = self.nav.screen() == Screen::CardDetail
            && self.nav.selected_card() == Some(&card)
            && matches!(
                self.slot,
                LessonSlot::Loading { .. } | LessonSlot::Ready { .. }
            );
        if already_open {
            return Ok(None);
        }

        self.nav = self.nav.select_card(card.clone())?;
        Ok(Some(self.issue(card)))
    }

    /// Leave the current screen. Leaving the detail screen abandons its lesson.
    pub fn back(&mut self) {
        self.nav = self.nav.back();
        if self.nav.screen() != Screen::CardDetail {
            self.slot = LessonSlot::Idle;
        }
    }

    pub fn home(&mut self) {
        self.nav = self.nav.home();
        self.slot = LessonSlot::Idle;
    }

    /// Run the request for `ticket`. Does not touch session state.
    ///
    /// # Errors
    ///
    /// Propagates `LessonError` from the lesson client.
    pub async fn fetch(&self, ticket: &LessonTicket) -> Result<LessonContent, LessonError> {
        self.lessons.fetch_lesson(&ticket.card).await
    }

    /// Apply a finished request. Returns `false` when the ticket is stale and
    /// the result was discarded.
    pub fn resolve(
        &mut self,
        ticket: &LessonTicket,
        result: Result<LessonContent, LessonError>,
    ) -> bool {
        let current = match &self.slot {
            LessonSlot::Loading { ticket: pending } => pending == ticket,
            _ => false,
        };
        if !current || self.nav.selected_card() != Some(&ticket.card) {
            tracing::debug!(card = %ticket.card, seq = ticket.seq, "discarding stale lesson result");
            return false;
        }

        let card = ticket.card.clone();
        self.slot = match result {
            Ok(lesson) => {
                let attempt = QuizAttempt::new(lesson.quiz.clone());
                LessonSlot::Ready {
                    card,
                    lesson,
                    attempt,
                }
            }
            Err(error) => LessonSlot::Failed { card, error },
        };
        true
    }

    /// Select `card` and load its lesson in one step.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Navigation` from the home screen. Lesson
    /// failures land in the slot, not here.
    pub async fn open_card(&mut self, card: CardName) -> Result<(), SessionError> {
        if let Some(ticket) = self.select_card(card)? {
            let result = self.fetch(&ticket).await;
            self.resolve(&ticket, result);
        }
        Ok(())
    }

    /// Ask again for the current card after a failed load.
    pub fn retry(&mut self) -> Option<LessonTicket> {
        match &self.slot {
            LessonSlot::Failed { card, .. } => {
                let card = card.clone();
                Some(self.issue(card))
            }
            _ => None,
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::NoLesson` without a loaded lesson, or
    /// `SessionError::Quiz` for an unknown question/option or a locked quiz.
    pub fn answer(&mut self, index: usize, option: &str) -> Result<(), SessionError> {
        match &mut self.slot {
            LessonSlot::Ready { attempt, .. } => Ok(attempt.select(index, option)?),
            _ => Err(SessionError::NoLesson),
        }
    }

    /// Grade the quiz. A full pass records the card as completed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoLesson` without a loaded lesson, or
    /// `SessionError::Quiz` if the quiz was already submitted.
    pub async fn submit_quiz(&mut self) -> Result<QuizResult, SessionError> {
        let (card, result) = match &mut self.slot {
            LessonSlot::Ready { card, attempt, .. } => (card.clone(), attempt.submit()?),
            _ => return Err(SessionError::NoLesson),
        };

        if result.passed {
            self.completed = self.progress.mark_complete(&self.completed, &card).await;
            tracing::info!(card = %card, "card completed");
        }
        Ok(result)
    }

    /// Reset the quiz so it can be taken again.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoLesson` without a loaded lesson.
    pub fn retry_quiz(&mut self) -> Result<(), SessionError> {
        match &mut self.slot {
            LessonSlot::Ready { attempt, .. } => {
                attempt.retry();
                Ok(())
            }
            _ => Err(SessionError::NoLesson),
        }
    }

    fn issue(&mut self, card: CardName) -> LessonTicket {
        self.next_seq += 1;
        let ticket = LessonTicket {
            card,
            seq: self.next_seq,
        };
        self.slot = LessonSlot::Loading {
            ticket: ticket.clone(),
        };
        ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::InMemoryStore;
    use tarot_core::model::ProviderSettingsDraft;

    use crate::error::ProviderError;
    use crate::lesson::{GenerationRequest, LessonProvider};

    /// Echoes the requested card back as a one-question lesson.
    struct EchoProvider;

    #[async_trait]
    impl LessonProvider for EchoProvider {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
            let name = ["El Mago", "La Luna"]
                .into_iter()
                .find(|card| request.prompt.contains(&format!("\"{card}\"")))
                .ok_or(ProviderError::EmptyResponse)?;
            Ok(format!(
                r#"{{"name": "{name}", "quiz": [{{"question": "q", "options": ["A", "B"], "correctAnswer": "A"}}]}}"#
            ))
        }
    }

    fn session() -> StudySession {
        let settings = ProviderSettingsDraft {
            api_key: Some("test-key".into()),
            ..ProviderSettingsDraft::default()
        }
        .validate()
        .unwrap();
        let lessons = Arc::new(LessonClient::new(settings, Arc::new(EchoProvider)));
        let progress = Arc::new(ProgressStore::new(Arc::new(InMemoryStore::new())));
        let mut session = StudySession::new(lessons, progress, CompletionSet::new());
        session.select_category(Arcana::Major).unwrap();
        session
    }

    fn card(name: &str) -> CardName {
        CardName::from(name)
    }

    #[tokio::test]
    async fn switching_card_in_detail_discards_previous_result() {
        let mut session = session();
        let mago = session.select_card(card("El Mago")).unwrap().unwrap();
        let mago_result = session.fetch(&mago).await;

        let luna = session.select_card(card("La Luna")).unwrap().unwrap();
        assert_eq!(session.navigation().screen(), Screen::CardDetail);
        assert_eq!(session.slot().card(), Some(&card("La Luna")));

        let luna_result = session.fetch(&luna).await;
        assert!(session.resolve(&luna, luna_result));
        assert!(!session.resolve(&mago, mago_result));

        match session.slot() {
            LessonSlot::Ready { lesson, .. } => assert_eq!(lesson.name, "La Luna"),
            other => panic!("expected La Luna lesson, got {other:?}"),
        }
        assert_eq!(session.slot().card(), Some(&card("La Luna")));
    }

    #[tokio::test]
    async fn reopening_same_card_rejects_earlier_ticket() {
        let mut session = session();
        let first = session.select_card(card("El Mago")).unwrap().unwrap();
        let first_result = session.fetch(&first).await;

        session.back();
        let second = session.select_card(card("El Mago")).unwrap().unwrap();
        assert_eq!(first.card(), second.card());
        assert_ne!(first, second);

        assert!(!session.resolve(&first, first_result));
        assert!(session.slot().is_loading());
        assert_eq!(session.slot().card(), Some(&card("El Mago")));

        let second_result = session.fetch(&second).await;
        assert!(session.resolve(&second, second_result));
        assert!(matches!(session.slot(), LessonSlot::Ready { .. }));
    }

    #[test]
    fn idle_slot_has_no_card() {
        let session = session();
        assert_eq!(session.slot().card(), None);
        assert!(!session.slot().is_loading());
    }
}
