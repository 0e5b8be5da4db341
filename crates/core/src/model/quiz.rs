use thiserror::Error;

use crate::model::lesson::QuizQuestion;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has already been submitted")]
    AlreadySubmitted,
    #[error("question {index} does not exist")]
    NoSuchQuestion { index: usize },
    #[error("\"{option}\" is not an option for question {index}")]
    NoSuchOption { index: usize, option: String },
}

/// Outcome of grading one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub correct: usize,
    pub total: usize,
    pub passed: bool,
}

/// Grade `answers` against `questions` by exact string match.
///
/// The quiz passes only when every question is answered correctly in the same
/// submission. Missing answers count as wrong, and an empty quiz never passes.
#[must_use]
pub fn grade(questions: &[QuizQuestion], answers: &[Option<String>]) -> QuizResult {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .get(*index)
                .and_then(Option::as_deref)
                .is_some_and(|answer| question.is_correct(answer))
        })
        .count();
    let total = questions.len();
    QuizResult {
        correct,
        total,
        passed: total > 0 && correct == total,
    }
}

/// A learner's answer sheet for one lesson quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<String>>,
    result: Option<QuizResult>,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let answers = vec![None; questions.len()];
        Self {
            questions,
            answers,
            result: None,
        }
    }

    #[must_use]
    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    #[must_use]
    pub fn result(&self) -> Option<QuizResult> {
        self.result
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    /// Choose `option` for question `index`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the attempt is locked, or the question or
    /// option does not exist.
    pub fn select(&mut self, index: usize, option: &str) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let question = self
            .questions
            .get(index)
            .ok_or(QuizError::NoSuchQuestion { index })?;
        if !question.options.iter().any(|o| o == option) {
            return Err(QuizError::NoSuchOption {
                index,
                option: option.to_string(),
            });
        }
        self.answers[index] = Some(option.to_string());
        Ok(())
    }

    /// Grade and lock the attempt.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` on a second submission.
    pub fn submit(&mut self) -> Result<QuizResult, QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let result = grade(&self.questions, &self.answers);
        self.result = Some(result);
        Ok(result)
    }

    /// Clear all answers and unlock the attempt.
    pub fn retry(&mut self) {
        self.answers.iter_mut().for_each(|answer| *answer = None);
        self.result = None;
    }
}
