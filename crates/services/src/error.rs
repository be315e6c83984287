//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OptionId, PassPolicyError, QuestionError, QuestionId};

/// Errors emitted by a `QuestionGenerator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("question generation failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("generation payload has no `questions` field")]
    MissingQuestions,
    #[error("generation payload `questions` is not an array")]
    NotAnArray,
    #[error("malformed question record: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    InvalidQuestions(#[from] QuestionError),
    #[error("failed to read question file: {0}")]
    Io(#[from] std::io::Error),
    #[error("question generator unavailable: {0}")]
    Unavailable(String),
}

/// Errors emitted by a `VerdictRecorder`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("quiz submission failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("verdict service unavailable: {0}")]
    Unavailable(String),
}

/// Precondition failures of `QuizSessionController` operations.
///
/// Returning one of these never changes session state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("questions are still loading")]
    Loading,
    #[error("no questions available")]
    NoQuestions,
    #[error("no current question")]
    NoCurrentQuestion,
    #[error("option {option} is not offered by question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
    #[error("quiz already submitted")]
    AlreadySubmitted,
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("{answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
}

/// Errors raised while reading service configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid base url {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("base url {0:?} must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid value for {var}: {raw:?}")]
    InvalidNumber { var: &'static str, raw: String },
    #[error(transparent)]
    PassPolicy(#[from] PassPolicyError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
