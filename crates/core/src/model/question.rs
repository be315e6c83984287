use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id} has no options")]
    NoOptions { id: QuestionId },

    #[error("question {id} repeats option {option}")]
    DuplicateOption { id: QuestionId, option: OptionId },

    #[error("option id cannot be empty (question {id})")]
    EmptyOptionId { id: QuestionId },

    #[error("question set is empty")]
    EmptySet,

    #[error("question id {id} appears more than once")]
    DuplicateQuestion { id: QuestionId },
}

//
// ─── OPTIONS ───────────────────────────────────────────────────────────────────
//

/// One selectable answer of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: impl Into<OptionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as produced by the generation service.
///
/// `correct_answer` is expected to name one of `options`, but that is the
/// generator's contract and is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", rename_all = "camelCase")]
pub struct Question {
    id: QuestionId,
    question: String,
    options: Vec<AnswerOption>,
    correct_answer: OptionId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    id: QuestionId,
    question: String,
    options: Vec<AnswerOption>,
    correct_answer: OptionId,
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.question, raw.options, raw.correct_answer)
    }
}

impl Question {
    /// Builds a question after checking its shape.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id is blank, there are no options,
    /// or option ids are blank or repeated.
    pub fn new(
        id: impl Into<QuestionId>,
        question: impl Into<String>,
        options: Vec<AnswerOption>,
        correct_answer: impl Into<OptionId>,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.as_str().trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if options.is_empty() {
            return Err(QuestionError::NoOptions { id });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if option.id.as_str().trim().is_empty() {
                return Err(QuestionError::EmptyOptionId { id });
            }
            if !seen.insert(&option.id) {
                return Err(QuestionError::DuplicateOption {
                    option: option.id.clone(),
                    id,
                });
            }
        }

        Ok(Self {
            id,
            question: question.into(),
            options,
            correct_answer: correct_answer.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    /// Prompt text shown to the learner.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &OptionId {
        &self.correct_answer
    }

    #[must_use]
    pub fn has_option(&self, option: &OptionId) -> bool {
        self.options.iter().any(|o| &o.id == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &OptionId) -> bool {
        &self.correct_answer == option
    }
}

/// Checks that a fetched question set can back a session: non-empty, with
/// question ids unique across the set.
///
/// # Errors
///
/// Returns `QuestionError::EmptySet` or `QuestionError::DuplicateQuestion`.
pub fn validate_question_set(questions: Vec<Question>) -> Result<Vec<Question>, QuestionError> {
    if questions.is_empty() {
        return Err(QuestionError::EmptySet);
    }
    let mut seen = HashSet::with_capacity(questions.len());
    for question in &questions {
        if !seen.insert(question.id()) {
            return Err(QuestionError::DuplicateQuestion {
                id: question.id().clone(),
            });
        }
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<AnswerOption> {
        vec![AnswerOption::new("a", "Higher"), AnswerOption::new("b", "Lower")]
    }

    #[test]
    fn new_accepts_well_formed_question() {
        let q = Question::new("q1", "Pitch of an approaching siren?", options(), "a").unwrap();
        assert_eq!(q.prompt(), "Pitch of an approaching siren?");
        assert!(q.has_option(&OptionId::new("b")));
        assert!(q.is_correct(&OptionId::new("a")));
        assert!(!q.is_correct(&OptionId::new("b")));
    }

    #[test]
    fn new_rejects_missing_options() {
        let err = Question::new("q1", "?", Vec::new(), "a").unwrap_err();
        assert!(matches!(err, QuestionError::NoOptions { .. }));
    }

    #[test]
    fn new_rejects_duplicate_options() {
        let opts = vec![AnswerOption::new("a", "x"), AnswerOption::new("a", "y")];
        let err = Question::new("q1", "?", opts, "a").unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateOption { .. }));
    }

    #[test]
    fn correct_answer_outside_options_is_not_enforced() {
        assert!(Question::new("q1", "?", options(), "z").is_ok());
    }

    #[test]
    fn deserializes_wire_shape() {
        let json = r#"{
            "id": "q1",
            "question": "What shifts in the Doppler effect?",
            "options": [{"id": "a", "text": "Frequency"}, {"id": "b", "text": "Mass"}],
            "correctAnswer": "a"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id(), &QuestionId::new("q1"));
        assert_eq!(q.correct_answer(), &OptionId::new("a"));
        assert_eq!(q.options().len(), 2);
    }

    #[test]
    fn deserialize_runs_shape_checks() {
        let json = r#"{"id": "q1", "question": "?", "options": [], "correctAnswer": "a"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());
    }

    #[test]
    fn question_set_rejects_duplicates_and_empty() {
        let q = Question::new("q1", "?", options(), "a").unwrap();
        assert_eq!(
            validate_question_set(Vec::new()).unwrap_err(),
            QuestionError::EmptySet
        );
        let err = validate_question_set(vec![q.clone(), q]).unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateQuestion { .. }));
    }
}
