use thiserror::Error;

use crate::model::{PassPolicyError, QuestionError, TopicError};

/// Umbrella error for domain validation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    PassPolicy(#[from] PassPolicyError),
}
