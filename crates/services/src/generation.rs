use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use quiz_core::model::{Question, Topic, validate_question_set};

use crate::config::QuizServiceConfig;
use crate::error::GenerationError;

/// Payload sent to the question generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: Topic,
    pub source_notes: Option<String>,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(topic: Topic, source_notes: Option<String>) -> Self {
        Self {
            topic,
            source_notes,
        }
    }
}

/// Produces an ordered question set for a topic.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generate questions for the request.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` on transport failures, non-success statuses or
    /// payloads without a well-formed question list.
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError>;
}

/// Decode a generator response body.
///
/// The body must be an object whose `questions` field is a non-empty array of
/// well-formed questions with distinct ids.
///
/// # Errors
///
/// Returns `GenerationError` describing the first problem found.
pub fn parse_generation_payload(body: &[u8]) -> Result<Vec<Question>, GenerationError> {
    let value: Value = serde_json::from_slice(body)?;
    let questions = match value {
        Value::Object(mut map) => map
            .remove("questions")
            .ok_or(GenerationError::MissingQuestions)?,
        _ => return Err(GenerationError::MissingQuestions),
    };
    decode_question_list(questions)
}

fn decode_question_list(value: Value) -> Result<Vec<Question>, GenerationError> {
    if !value.is_array() {
        return Err(GenerationError::NotAnArray);
    }
    let questions: Vec<Question> = serde_json::from_value(value)?;
    Ok(validate_question_set(questions)?)
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Generator backed by the quiz HTTP API.
#[derive(Clone)]
pub struct HttpQuestionGenerator {
    client: Client,
    url: String,
}

impl HttpQuestionGenerator {
    /// # Errors
    ///
    /// Returns `GenerationError::Http` if the HTTP client cannot be built.
    pub fn new(config: &QuizServiceConfig) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    #[must_use]
    pub fn with_client(client: Client, config: &QuizServiceConfig) -> Self {
        Self {
            client,
            url: config.generate_url(),
        }
    }
}

#[async_trait]
impl QuestionGenerator for HttpQuestionGenerator {
    #[instrument(skip(self, request), fields(topic = %request.topic, url = %self.url))]
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError> {
        let response = self.client.post(&self.url).json(request).send().await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let body = response.bytes().await?;
        let questions = parse_generation_payload(&body)?;
        debug!(count = questions.len(), "decoded question set");
        Ok(questions)
    }
}

//
// ─── FILE ──────────────────────────────────────────────────────────────────────
//

/// Generator that serves a fixed question set from a JSON file.
///
/// Accepts either the HTTP payload shape (`{"questions": [...]}`) or a bare
/// array. The topic is ignored.
#[derive(Clone, Debug)]
pub struct FileQuestionGenerator {
    path: PathBuf,
}

impl FileQuestionGenerator {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionGenerator for FileQuestionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError> {
        let body = tokio::fs::read(&self.path).await?;
        let value: Value = serde_json::from_slice(&body)?;
        let questions = match value {
            Value::Array(_) => decode_question_list(value)?,
            _ => parse_generation_payload(&body)?,
        };
        debug!(
            path = %self.path.display(),
            topic = %request.topic,
            count = questions.len(),
            "loaded question file"
        );
        Ok(questions)
    }
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// Generator that hands out a preset question set, or always fails when built
/// with [`StaticQuestionGenerator::failing`]. Records every request it sees.
#[derive(Clone, Debug, Default)]
pub struct StaticQuestionGenerator {
    questions: Option<Vec<Question>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl StaticQuestionGenerator {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Some(questions),
            requests: Arc::default(),
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self::default()
    }

    /// Requests received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl QuestionGenerator for StaticQuestionGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Question>, GenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.questions
            .clone()
            .ok_or_else(|| GenerationError::Unavailable("no question set configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "questions": [
            {
                "id": "q1",
                "question": "An ambulance approaches. Its siren pitch sounds...",
                "options": [{"id": "a", "text": "Higher"}, {"id": "b", "text": "Lower"}],
                "correctAnswer": "a"
            },
            {
                "id": "q2",
                "question": "The Doppler effect changes the observed...",
                "options": [{"id": "a", "text": "Amplitude"}, {"id": "b", "text": "Frequency"}],
                "correctAnswer": "b"
            }
        ]
    }"#;

    #[test]
    fn parses_questions_in_order() {
        let questions = parse_generation_payload(PAYLOAD.as_bytes()).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id().as_str(), "q1");
        assert_eq!(questions[1].correct_answer().as_str(), "b");
    }

    #[test]
    fn missing_questions_field_is_failure() {
        let err = parse_generation_payload(br#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MissingQuestions));
    }

    #[test]
    fn bare_array_is_rejected_over_http() {
        let err = parse_generation_payload(b"[]").unwrap_err();
        assert!(matches!(err, GenerationError::MissingQuestions));
    }

    #[test]
    fn non_array_questions_is_failure() {
        let err = parse_generation_payload(br#"{"questions": "soon"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::NotAnArray));
    }

    #[test]
    fn empty_question_list_is_failure() {
        let err = parse_generation_payload(br#"{"questions": []}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidQuestions(_)));
    }

    #[test]
    fn malformed_record_is_failure() {
        let body = br#"{"questions": [{"id": "q1", "question": "?"}]}"#;
        let err = parse_generation_payload(body).unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn invalid_json_is_failure() {
        let err = parse_generation_payload(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, GenerationError::Decode(_)));
    }

    #[test]
    fn request_uses_wire_field_names() {
        let request = GenerationRequest::new(Topic::parse("Doppler Effect").unwrap(), None);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"topic": "Doppler Effect", "sourceNotes": null})
        );
    }

    #[tokio::test]
    async fn file_generator_reads_bare_array() {
        let path = std::env::temp_dir().join(format!("quiz-bare-{}.json", std::process::id()));
        let array = serde_json::from_str::<Value>(PAYLOAD).unwrap()["questions"].clone();
        tokio::fs::write(&path, array.to_string()).await.unwrap();

        let generator = FileQuestionGenerator::new(&path);
        let request = GenerationRequest::new(Topic::parse("Waves").unwrap(), None);
        let questions = generator.generate(&request).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(questions.len(), 2);
    }

    #[tokio::test]
    async fn static_generator_records_requests() {
        let questions = parse_generation_payload(PAYLOAD.as_bytes()).unwrap();
        let generator = StaticQuestionGenerator::new(questions);
        let request = GenerationRequest::new(
            Topic::parse("Doppler Effect").unwrap(),
            Some("chapter 4".into()),
        );

        assert_eq!(generator.generate(&request).await.unwrap().len(), 2);
        assert_eq!(generator.requests(), vec![request.clone()]);

        let failing = StaticQuestionGenerator::failing();
        assert!(failing.generate(&request).await.is_err());
    }

    #[tokio::test]
    async fn file_generator_missing_file_is_failure() {
        let generator = FileQuestionGenerator::new("/definitely/not/here.json");
        let request = GenerationRequest::new(Topic::parse("Waves").unwrap(), None);
        let err = generator.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::Io(_)));
    }
}
