use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use quiz_core::model::{PassPolicy, Topic, Verdict};

use crate::config::QuizServiceConfig;
use crate::error::SubmissionError;

/// Raw result of a finished attempt, sent to the verdict service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizSubmission {
    pub topic: Topic,
    pub score: u32,
    pub total: u32,
}

impl QuizSubmission {
    #[must_use]
    pub fn new(topic: Topic, score: usize, total: usize) -> Self {
        Self {
            topic,
            score: u32::try_from(score).unwrap_or(u32::MAX),
            total: u32::try_from(total).unwrap_or(u32::MAX),
        }
    }
}

/// Records a submission and returns the pass/fail verdict.
#[async_trait]
pub trait VerdictRecorder: Send + Sync {
    /// # Errors
    ///
    /// Returns `SubmissionError` when the verdict cannot be obtained.
    async fn record(&self, submission: &QuizSubmission) -> Result<Verdict, SubmissionError>;
}

/// Verdict service reached over HTTP.
#[derive(Clone)]
pub struct HttpVerdictRecorder {
    client: Client,
    url: String,
}

impl HttpVerdictRecorder {
    /// # Errors
    ///
    /// Returns `SubmissionError::Http` if the HTTP client cannot be built.
    pub fn new(config: &QuizServiceConfig) -> Result<Self, SubmissionError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    #[must_use]
    pub fn with_client(client: Client, config: &QuizServiceConfig) -> Self {
        Self {
            client,
            url: config.submit_url(),
        }
    }
}

#[async_trait]
impl VerdictRecorder for HttpVerdictRecorder {
    #[instrument(skip(self, submission), fields(topic = %submission.topic, score = submission.score, total = submission.total))]
    async fn record(&self, submission: &QuizSubmission) -> Result<Verdict, SubmissionError> {
        let response = self
            .client
            .post(&self.url)
            .json(submission)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmissionError::HttpStatus(response.status()));
        }

        let verdict: Verdict = response.json().await?;
        debug!(passed = verdict.passed, "verdict received");
        Ok(verdict)
    }
}

/// Judges submissions in-process with a `PassPolicy`. Used for offline play.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalVerdictRecorder {
    policy: PassPolicy,
}

impl LocalVerdictRecorder {
    #[must_use]
    pub fn new(policy: PassPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn judge(&self, submission: &QuizSubmission) -> Verdict {
        let score = usize::try_from(submission.score).unwrap_or(usize::MAX);
        let passed = self.policy.passes(score);
        let message = if passed {
            format!(
                "You scored {}/{} on {}. Nicely done.",
                submission.score, submission.total, submission.topic
            )
        } else {
            format!(
                "You scored {}/{} on {}. Get at least {} right to pass.",
                submission.score,
                submission.total,
                submission.topic,
                self.policy.min_correct()
            )
        };
        Verdict::new(passed, message)
    }
}

#[async_trait]
impl VerdictRecorder for LocalVerdictRecorder {
    async fn record(&self, submission: &QuizSubmission) -> Result<Verdict, SubmissionError> {
        Ok(self.judge(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(score: usize, total: usize) -> QuizSubmission {
        QuizSubmission::new(Topic::parse("Doppler Effect").unwrap(), score, total)
    }

    #[test]
    fn submission_wire_shape() {
        let json = serde_json::to_value(submission(3, 5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"topic": "Doppler Effect", "score": 3, "total": 5})
        );
    }

    #[test]
    fn local_verdict_uses_absolute_threshold() {
        let recorder = LocalVerdictRecorder::default();
        assert!(recorder.judge(&submission(3, 5)).passed);
        assert!(!recorder.judge(&submission(2, 5)).passed);
        assert!(recorder.judge(&submission(3, 10)).passed);
    }

    #[tokio::test]
    async fn local_recorder_reports_threshold_on_fail() {
        let recorder = LocalVerdictRecorder::new(PassPolicy::new(4).unwrap());
        let verdict = recorder.record(&submission(3, 5)).await.unwrap();
        assert!(!verdict.passed);
        assert!(verdict.message.contains("at least 4"));
    }
}
