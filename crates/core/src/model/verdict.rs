use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── VERDICT ───────────────────────────────────────────────────────────────────
//

/// Outcome returned by the scoring service for a submitted quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub passed: bool,
    pub message: String,
}

impl Verdict {
    #[must_use]
    pub fn new(passed: bool, message: impl Into<String>) -> Self {
        Self {
            passed,
            message: message.into(),
        }
    }
}

//
// ─── PASS POLICY ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PassPolicyError {
    #[error("pass threshold must be > 0")]
    ZeroThreshold,
}

/// Minimum number of correct answers needed to pass.
///
/// The threshold is an absolute count and does not scale with the number of
/// questions in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPolicy {
    min_correct: usize,
}

impl PassPolicy {
    pub const DEFAULT_MIN_CORRECT: usize = 3;

    /// # Errors
    ///
    /// Returns `PassPolicyError::ZeroThreshold` for a threshold of zero.
    pub fn new(min_correct: usize) -> Result<Self, PassPolicyError> {
        if min_correct == 0 {
            return Err(PassPolicyError::ZeroThreshold);
        }
        Ok(Self { min_correct })
    }

    #[must_use]
    pub fn min_correct(&self) -> usize {
        self.min_correct
    }

    #[must_use]
    pub fn passes(&self, score: usize) -> bool {
        score >= self.min_correct
    }
}

impl Default for PassPolicy {
    fn default() -> Self {
        Self {
            min_correct: Self::DEFAULT_MIN_CORRECT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_threshold_is_three() {
        let policy = PassPolicy::default();
        assert!(policy.passes(3));
        assert!(policy.passes(5));
        assert!(!policy.passes(2));
        assert!(!policy.passes(0));
    }

    #[test]
    fn threshold_is_absolute() {
        let policy = PassPolicy::default();
        // Three correct out of ten still passes.
        assert!(policy.passes(3));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        assert_eq!(PassPolicy::new(0).unwrap_err(), PassPolicyError::ZeroThreshold);
    }

    #[test]
    fn verdict_wire_shape() {
        let v: Verdict =
            serde_json::from_str(r#"{"passed": true, "message": "Nice work"}"#).unwrap();
        assert_eq!(v, Verdict::new(true, "Nice work"));
    }
}
