use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use quiz_core::model::{
    Notice, OptionId, PassPolicy, Question, SessionId, Topic, Verdict, validate_question_set,
};

use crate::Clock;
use crate::error::{GenerationError, QuizError, SubmissionError};
use crate::generation::{GenerationRequest, QuestionGenerator};
use crate::notices::NoticeSink;
use crate::verdict_service::{QuizSubmission, VerdictRecorder};

use super::state::{SessionPhase, SessionState};
use super::view::QuizView;

//
// ─── TICKETS & OUTCOMES ────────────────────────────────────────────────────────
//

/// Handle for an outstanding question fetch.
///
/// Only the ticket of the most recent activation is applied; older ones are
/// discarded when they complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationTicket {
    request_seq: u64,
    session_id: SessionId,
    request: GenerationRequest,
}

impl ActivationTicket {
    #[must_use]
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    #[must_use]
    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }
}

/// Handle for an outstanding verdict call. The score is frozen when the ticket
/// is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    request_seq: u64,
    attempt: u64,
    submission: QuizSubmission,
}

impl SubmitTicket {
    #[must_use]
    pub fn submission(&self) -> &QuizSubmission {
        &self.submission
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    Loaded { questions: usize },
    Failed,
    /// A newer activation started before this one completed.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Recorded(Verdict),
    Failed,
    /// The session was re-activated or retried while the call was in flight.
    Stale,
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// State machine for one learner's quiz session.
///
/// The controller owns its `SessionState` exclusively. Collaborator failures
/// never escape `activate`/`submit`: they are folded into state and reported
/// through the notice sink.
pub struct QuizSessionController {
    clock: Clock,
    policy: PassPolicy,
    generator: Arc<dyn QuestionGenerator + Send + Sync>,
    recorder: Arc<dyn VerdictRecorder + Send + Sync>,
    notices: Arc<dyn NoticeSink + Send + Sync>,
    request_seq: u64,
    attempt: u64,
    session_id: Option<SessionId>,
    state: SessionState,
}

impl QuizSessionController {
    #[must_use]
    pub fn new(
        clock: Clock,
        generator: Arc<dyn QuestionGenerator + Send + Sync>,
        recorder: Arc<dyn VerdictRecorder + Send + Sync>,
        notices: Arc<dyn NoticeSink + Send + Sync>,
    ) -> Self {
        Self {
            clock,
            policy: PassPolicy::default(),
            generator,
            recorder,
            notices,
            request_seq: 0,
            attempt: 0,
            session_id: None,
            state: SessionState::default(),
        }
    }

    #[must_use]
    pub fn with_pass_policy(mut self, policy: PassPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session_id
    }

    #[must_use]
    pub fn pass_policy(&self) -> PassPolicy {
        self.policy
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.state.current_question()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.state.score()
    }

    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.state.all_answered()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    #[must_use]
    pub fn view(&self) -> QuizView {
        QuizView::from_state(&self.state, self.policy)
    }

    /// Generator shared with callers that drive `begin_activation` /
    /// `complete_activation` themselves.
    #[must_use]
    pub fn generator(&self) -> Arc<dyn QuestionGenerator + Send + Sync> {
        Arc::clone(&self.generator)
    }

    #[must_use]
    pub fn recorder(&self) -> Arc<dyn VerdictRecorder + Send + Sync> {
        Arc::clone(&self.recorder)
    }

    //
    // ─── ACTIVATION ────────────────────────────────────────────────────────────
    //

    /// Start a session for `topic` and fetch its questions.
    pub async fn activate(
        &mut self,
        topic: Topic,
        source_notes: Option<String>,
    ) -> ActivationOutcome {
        let ticket = self.begin_activation(topic, source_notes);
        let generator = Arc::clone(&self.generator);
        let result = {
            let mut pending = PendingLoad {
                state: &mut self.state,
                notices: self.notices.as_ref(),
                clock: self.clock,
                settled: false,
            };
            let result = generator.generate(ticket.request()).await;
            pending.settled = true;
            result
        };
        self.complete_activation(ticket, result)
    }

    /// Discard the current session and start a fresh one in the loading phase.
    pub fn begin_activation(&mut self, topic: Topic, source_notes: Option<String>) -> ActivationTicket {
        self.request_seq += 1;
        self.attempt += 1;
        let session_id = SessionId::new_random();
        self.session_id = Some(session_id);

        info!(session = %session_id, topic = %topic, "activating quiz session");

        self.state = SessionState::loading(topic.clone(), source_notes.clone());
        ActivationTicket {
            request_seq: self.request_seq,
            session_id,
            request: GenerationRequest::new(topic, source_notes),
        }
    }

    /// Apply the generator's answer for `ticket`.
    pub fn complete_activation(
        &mut self,
        ticket: ActivationTicket,
        result: Result<Vec<Question>, GenerationError>,
    ) -> ActivationOutcome {
        if ticket.request_seq != self.request_seq {
            debug!(
                session = %ticket.session_id,
                topic = %ticket.request.topic,
                "discarding stale question set"
            );
            return ActivationOutcome::Stale;
        }

        match result.and_then(|qs| validate_question_set(qs).map_err(GenerationError::from)) {
            Ok(questions) => {
                let count = questions.len();
                self.state.load_questions(questions);
                info!(session = %ticket.session_id, count, "questions loaded");
                ActivationOutcome::Loaded { questions: count }
            }
            Err(err) => {
                warn!(session = %ticket.session_id, error = %err, "question generation failed");
                self.state.fail_load();
                self.notices.notify(Notice::load_failed(self.clock.now()));
                ActivationOutcome::Failed
            }
        }
    }

    //
    // ─── ANSWERING & NAVIGATION ────────────────────────────────────────────────
    //

    /// Record `option` as the answer to the current question, replacing any
    /// earlier selection.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` without changing state when there is no current
    /// question, the option is not offered, or the quiz is submitting or
    /// already submitted.
    pub fn select_option(&mut self, option: OptionId) -> Result<(), QuizError> {
        if self.state.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        if self.state.is_submitting() {
            return Err(QuizError::SubmitInFlight);
        }
        let question = self
            .state
            .current_question()
            .ok_or(QuizError::NoCurrentQuestion)?;
        if !question.has_option(&option) {
            return Err(QuizError::UnknownOption {
                question: question.id().clone(),
                option,
            });
        }

        self.state.select(option);
        Ok(())
    }

    /// Move to the next question. Returns false at the last question.
    pub fn next(&mut self) -> bool {
        self.state.next()
    }

    /// Move to the previous question. Returns false at the first question.
    pub fn previous(&mut self) -> bool {
        self.state.previous()
    }

    /// Jump to `index`; out-of-range indexes are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        self.state.go_to(index)
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Score the answers and ask the verdict service for a result.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` when submission is not currently allowed. A failed
    /// verdict call is not an error; it yields `SubmitOutcome::Failed`.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, QuizError> {
        let ticket = self.begin_submit()?;
        let recorder = Arc::clone(&self.recorder);
        let result = {
            let _submitting = ClearOnDrop(self.state.submitting_flag());
            recorder.record(ticket.submission()).await
        };
        Ok(self.complete_submit(ticket, result))
    }

    /// Check submit preconditions, mark the session busy and freeze the score.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` without changing state when submission is not
    /// allowed.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, QuizError> {
        if self.state.is_loading() {
            return Err(QuizError::Loading);
        }
        if self.state.is_submitting() {
            return Err(QuizError::SubmitInFlight);
        }
        if self.state.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let total = self.state.questions().len();
        let Some(topic) = self.state.topic().cloned().filter(|_| total > 0) else {
            return Err(QuizError::NoQuestions);
        };
        if !self.state.all_answered() {
            return Err(QuizError::Incomplete {
                answered: self.state.progress().answered,
                total,
            });
        }

        let score = self.state.score();
        *self.state.submitting_flag() = true;
        info!(score, total, "submitting quiz");

        Ok(SubmitTicket {
            request_seq: self.request_seq,
            attempt: self.attempt,
            submission: QuizSubmission::new(topic, score, total),
        })
    }

    /// Apply the verdict service's answer for `ticket`. Always leaves the
    /// session not submitting.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<Verdict, SubmissionError>,
    ) -> SubmitOutcome {
        if ticket.request_seq != self.request_seq {
            debug!("discarding verdict for a replaced session");
            return SubmitOutcome::Stale;
        }
        *self.state.submitting_flag() = false;
        if ticket.attempt != self.attempt {
            debug!("discarding verdict for a retried attempt");
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(verdict) => {
                info!(passed = verdict.passed, "verdict recorded");
                self.notices
                    .notify(Notice::verdict(&verdict, self.clock.now()));
                self.state.record_verdict(verdict.clone());
                SubmitOutcome::Recorded(verdict)
            }
            Err(err) => {
                warn!(error = %err, "quiz submission failed");
                self.notices.notify(Notice::submit_failed(self.clock.now()));
                SubmitOutcome::Failed
            }
        }
    }

    //
    // ─── RETRY ─────────────────────────────────────────────────────────────────
    //

    /// Start another attempt over the same question set without re-fetching.
    pub fn retry(&mut self) {
        self.attempt += 1;
        self.state.reset_attempt();
        debug!(attempt = self.attempt, "quiz attempt reset");
    }
}

impl fmt::Debug for QuizSessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSessionController")
            .field("session_id", &self.session_id)
            .field("phase", &self.state.phase())
            .field("questions_len", &self.state.questions().len())
            .field("current_index", &self.state.current_index())
            .field("answered", &self.state.answers().len())
            .field("request_seq", &self.request_seq)
            .field("attempt", &self.attempt)
            .finish_non_exhaustive()
    }
}

/// Fails the load if the fetch is abandoned before it settles, so a cancelled
/// activation ends in `LoadFailed` rather than an empty `Ready` session.
struct PendingLoad<'a> {
    state: &'a mut SessionState,
    notices: &'a (dyn NoticeSink + Send + Sync),
    clock: Clock,
    settled: bool,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("question fetch abandoned before it completed");
        self.state.fail_load();
        self.notices.notify(Notice::load_failed(self.clock.now()));
    }
}

/// Resets a busy flag when dropped, including when the owning future is
/// cancelled mid-await.
struct ClearOnDrop<'a>(&'a mut bool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
