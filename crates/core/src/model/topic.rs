use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopicError {
    #[error("topic must not be empty")]
    Empty,
}

/// Subject a quiz is generated for. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Parses a topic, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::Empty` when the input is blank.
    pub fn parse(s: impl Into<String>) -> Result<Self, TopicError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Topic {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Topic> for String {
    fn from(value: Topic) -> Self {
        value.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let topic = Topic::parse("  Doppler Effect ").unwrap();
        assert_eq!(topic.as_str(), "Doppler Effect");
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(Topic::parse(" \n").unwrap_err(), TopicError::Empty);
    }

    #[test]
    fn deserialize_rejects_blank() {
        let result: Result<Topic, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }
}
