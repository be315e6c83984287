use std::path::PathBuf;
use std::sync::Arc;

use crate::Clock;
use crate::config::QuizServiceConfig;
use crate::error::AppServicesError;
use crate::generation::{FileQuestionGenerator, HttpQuestionGenerator, QuestionGenerator};
use crate::notices::NoticeSink;
use crate::quiz::QuizSessionController;
use crate::verdict_service::{HttpVerdictRecorder, LocalVerdictRecorder, VerdictRecorder};

/// Where questions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    Http,
    File(PathBuf),
}

/// Who decides pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictSource {
    Http,
    Local,
}

/// Assembles the collaborators a quiz session needs and hands out
/// controllers wired to them.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    config: QuizServiceConfig,
    generator: Arc<dyn QuestionGenerator + Send + Sync>,
    recorder: Arc<dyn VerdictRecorder + Send + Sync>,
    notices: Arc<dyn NoticeSink + Send + Sync>,
}

impl AppServices {
    /// Build services for the given sources.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if an HTTP client cannot be constructed.
    pub fn new(
        clock: Clock,
        config: QuizServiceConfig,
        questions: QuestionSource,
        verdicts: VerdictSource,
        notices: Arc<dyn NoticeSink + Send + Sync>,
    ) -> Result<Self, AppServicesError> {
        let generator: Arc<dyn QuestionGenerator + Send + Sync> = match questions {
            QuestionSource::Http => Arc::new(HttpQuestionGenerator::new(&config)?),
            QuestionSource::File(path) => Arc::new(FileQuestionGenerator::new(path)),
        };
        let recorder: Arc<dyn VerdictRecorder + Send + Sync> = match verdicts {
            VerdictSource::Http => Arc::new(HttpVerdictRecorder::new(&config)?),
            VerdictSource::Local => Arc::new(LocalVerdictRecorder::new(config.pass_policy)),
        };

        Ok(Self {
            clock,
            config,
            generator,
            recorder,
            notices,
        })
    }

    #[must_use]
    pub fn config(&self) -> &QuizServiceConfig {
        &self.config
    }

    /// A fresh controller in the idle phase.
    #[must_use]
    pub fn quiz_session(&self) -> QuizSessionController {
        QuizSessionController::new(
            self.clock,
            Arc::clone(&self.generator),
            Arc::clone(&self.recorder),
            Arc::clone(&self.notices),
        )
        .with_pass_policy(self.config.pass_policy)
    }
}
