use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CardName;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Structural problems with a decoded lesson.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonShapeError {
    #[error("lesson is missing a card name")]
    MissingName,
    #[error("lesson has no quiz questions")]
    EmptyQuiz,
    #[error("quiz question {index} has no options")]
    NoOptions { index: usize },
    #[error("quiz question {index} has a correct answer that is not one of its options")]
    AnswerNotInOptions { index: usize },
}

//
// ─── LESSON ───────────────────────────────────────────────────────────────────
//

/// Generated lesson content for a single card.
///
/// Every field defaults when absent so that decoding only fails on type
/// mismatches; [`LessonContent::check_shape`] decides what is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub story: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub upright_meaning: String,
    #[serde(default)]
    pub reversed_meaning: String,
    #[serde(default)]
    pub quiz: Vec<QuizQuestion>,
}

/// One multiple-choice question. The correct answer is linked to the options
/// by exact string equality only.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Exact, case-sensitive comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    #[must_use]
    pub fn answer_is_listed(&self) -> bool {
        self.options.iter().any(|option| option == &self.correct_answer)
    }
}

impl LessonContent {
    /// Verify the fields the rest of the app relies on.
    ///
    /// Requires a non-blank `name`, at least one quiz question, and for each
    /// question a correct answer that appears verbatim among its options.
    /// Prose fields are not checked here; see [`LessonContent::blank_fields`].
    ///
    /// # Errors
    ///
    /// Returns the first `LessonShapeError` found.
    pub fn check_shape(&self) -> Result<(), LessonShapeError> {
        if self.name.trim().is_empty() {
            return Err(LessonShapeError::MissingName);
        }
        if self.quiz.is_empty() {
            return Err(LessonShapeError::EmptyQuiz);
        }
        for (index, question) in self.quiz.iter().enumerate() {
            if question.options.is_empty() {
                return Err(LessonShapeError::NoOptions { index });
            }
            if !question.answer_is_listed() {
                return Err(LessonShapeError::AnswerNotInOptions { index });
            }
        }
        Ok(())
    }

    /// Whether the lesson's `name` matches the card it was requested for.
    #[must_use]
    pub fn echoes(&self, card: &CardName) -> bool {
        self.name.trim() == card.as_str()
    }

    /// Names of prose fields that came back blank.
    #[must_use]
    pub fn blank_fields(&self) -> Vec<&'static str> {
        let mut blank = Vec::new();
        let prose = [
            ("description", &self.description),
            ("story", &self.story),
            ("uprightMeaning", &self.upright_meaning),
            ("reversedMeaning", &self.reversed_meaning),
        ];
        for (field, value) in prose {
            if value.trim().is_empty() {
                blank.push(field);
            }
        }
        if self.keywords.is_empty() {
            blank.push("keywords");
        }
        blank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], correct: &str) -> QuizQuestion {
        QuizQuestion {
            question: "¿Qué representa?".into(),
            options: options.iter().map(|o| (*o).to_string()).collect(),
            correct_answer: correct.into(),
        }
    }

    fn lesson() -> LessonContent {
        LessonContent {
            name: "El Mago".into(),
            description: "Manifestación".into(),
            story: "Había una vez".into(),
            keywords: vec!["voluntad".into()],
            upright_meaning: "Poder".into(),
            reversed_meaning: "Manipulación".into(),
            quiz: vec![question(&["Poder", "Caos"], "Poder")],
        }
    }

    #[test]
    fn decodes_camel_case_fields() {
        let json = r#"{
            "name": "El Mago",
            "uprightMeaning": "Poder",
            "reversedMeaning": "Engaño",
            "quiz": [{"question": "q", "options": ["a", "b"], "correctAnswer": "b"}]
        }"#;
        let lesson: LessonContent = serde_json::from_str(json).unwrap();
        assert_eq!(lesson.upright_meaning, "Poder");
        assert_eq!(lesson.quiz[0].correct_answer, "b");
        assert!(lesson.description.is_empty());
    }

    #[test]
    fn shape_requires_name_and_quiz() {
        assert_eq!(lesson().check_shape(), Ok(()));

        let mut unnamed = lesson();
        unnamed.name = "  ".into();
        assert_eq!(unnamed.check_shape(), Err(LessonShapeError::MissingName));

        let mut no_quiz = lesson();
        no_quiz.quiz.clear();
        assert_eq!(no_quiz.check_shape(), Err(LessonShapeError::EmptyQuiz));
    }

    #[test]
    fn shape_rejects_answer_missing_from_options() {
        let mut bad = lesson();
        bad.quiz.push(question(&["Luz", "Sombra"], "luz"));
        assert_eq!(
            bad.check_shape(),
            Err(LessonShapeError::AnswerNotInOptions { index: 1 })
        );
    }

    #[test]
    fn blank_fields_lists_loose_fields_only() {
        let mut sparse = lesson();
        sparse.story.clear();
        sparse.keywords.clear();
        assert_eq!(sparse.blank_fields(), vec!["story", "keywords"]);
        assert!(sparse.check_shape().is_ok());
    }

    #[test]
    fn echoes_compares_trimmed_name() {
        let mut l = lesson();
        l.name = " El Mago ".into();
        assert!(l.echoes(&CardName::from("El Mago")));
        assert!(!l.echoes(&CardName::from("La Luna")));
    }
}
