#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod error;
pub mod generation;
pub mod notices;
pub mod quiz;
pub mod verdict_service;

pub use quiz_core::Clock;

pub use app_services::{AppServices, QuestionSource, VerdictSource};
pub use config::QuizServiceConfig;
pub use error::{AppServicesError, ConfigError, GenerationError, QuizError, SubmissionError};
pub use generation::{
    FileQuestionGenerator, GenerationRequest, HttpQuestionGenerator, QuestionGenerator,
    StaticQuestionGenerator, parse_generation_payload,
};
pub use notices::{NoticeLog, NoticeSink, TeeNoticeSink, TracingNoticeSink};
pub use quiz::{
    ActivationOutcome, ActivationTicket, QuizSessionController, QuizView, SessionPhase,
    SessionState, SubmitOutcome, SubmitTicket,
};
pub use verdict_service::{
    HttpVerdictRecorder, LocalVerdictRecorder, QuizSubmission, VerdictRecorder,
};
