use quiz_core::model::{AnswerMap, OptionId, Question, Topic, Verdict};
use quiz_core::scoring;

use super::progress::QuizProgress;

/// Where a session is in its lifecycle, derived from the raw flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No activation yet.
    Idle,
    /// Waiting on the question generator.
    Loading,
    /// Questions are available for navigation, selection and submission.
    Ready,
    /// Generation failed. Only a new activation leaves this phase.
    LoadFailed,
    /// Waiting on the verdict service.
    Submitting,
    /// A verdict was stored.
    Result,
}

/// Raw state of one quiz session.
///
/// Score and completeness are not stored; they are recomputed from
/// `questions` and `answers` on every read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    topic: Option<Topic>,
    source_notes: Option<String>,
    questions: Vec<Question>,
    current_index: usize,
    answers: AnswerMap,
    submitted: bool,
    result: Option<Verdict>,
    loading: bool,
    submitting: bool,
    load_failed: bool,
}

impl SessionState {
    /// Fresh state for a new activation, waiting on questions.
    pub(crate) fn loading(topic: Topic, source_notes: Option<String>) -> Self {
        Self {
            topic: Some(topic),
            source_notes,
            loading: true,
            ..Self::default()
        }
    }

    //
    // ─── READ ──────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    #[must_use]
    pub fn source_notes(&self) -> Option<&str> {
        self.source_notes.as_deref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn result(&self) -> Option<&Verdict> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    #[must_use]
    pub fn selected_for_current(&self) -> Option<&OptionId> {
        self.current_question()
            .and_then(|q| self.answers.get(q.id()))
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        !self.questions.is_empty() && self.current_index + 1 == self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        scoring::score(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn all_answered(&self) -> bool {
        scoring::all_answered(&self.questions, &self.answers)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress::new(
            self.questions.len(),
            scoring::answered_count(&self.questions, &self.answers),
        )
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitted
            && !self.submitting
            && !self.loading
            && !self.questions.is_empty()
            && self.all_answered()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.topic.is_none() {
            SessionPhase::Idle
        } else if self.loading {
            SessionPhase::Loading
        } else if self.load_failed {
            SessionPhase::LoadFailed
        } else if self.submitting {
            SessionPhase::Submitting
        } else if self.submitted && self.result.is_some() {
            SessionPhase::Result
        } else {
            SessionPhase::Ready
        }
    }

    //
    // ─── WRITE ─────────────────────────────────────────────────────────────────
    //

    pub(crate) fn load_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.current_index = 0;
        self.answers.clear();
        self.loading = false;
        self.load_failed = false;
    }

    pub(crate) fn fail_load(&mut self) {
        self.questions.clear();
        self.current_index = 0;
        self.answers.clear();
        self.loading = false;
        self.load_failed = true;
    }

    pub(crate) fn submitting_flag(&mut self) -> &mut bool {
        &mut self.submitting
    }

    pub(crate) fn select(&mut self, option: OptionId) -> Option<OptionId> {
        let question = self.current_question()?.id().clone();
        self.answers.select(question, option)
    }

    pub(crate) fn next(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            return true;
        }
        false
    }

    pub(crate) fn previous(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            return true;
        }
        false
    }

    pub(crate) fn go_to(&mut self, index: usize) -> bool {
        if index < self.questions.len() && index != self.current_index {
            self.current_index = index;
            return true;
        }
        false
    }

    pub(crate) fn record_verdict(&mut self, verdict: Verdict) {
        self.result = Some(verdict);
        self.submitted = true;
    }

    pub(crate) fn reset_attempt(&mut self) {
        self.answers.clear();
        self.current_index = 0;
        self.submitted = false;
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::AnswerOption;

    fn ready_state(n: usize) -> SessionState {
        let mut state = SessionState::loading(Topic::parse("Optics").unwrap(), None);
        let questions = (1..=n)
            .map(|i| {
                Question::new(
                    format!("q{i}"),
                    format!("Question {i}"),
                    vec![AnswerOption::new("a", "A"), AnswerOption::new("b", "B")],
                    "a",
                )
                .unwrap()
            })
            .collect();
        state.load_questions(questions);
        state
    }

    #[test]
    fn default_state_is_idle() {
        assert_eq!(SessionState::default().phase(), SessionPhase::Idle);
    }

    #[test]
    fn loading_state_reports_loading() {
        let state = SessionState::loading(Topic::parse("Optics").unwrap(), Some("notes".into()));
        assert_eq!(state.phase(), SessionPhase::Loading);
        assert_eq!(state.source_notes(), Some("notes"));
        assert!(!state.can_submit());
    }

    #[test]
    fn cursor_is_clamped_at_both_ends() {
        let mut state = ready_state(3);
        assert!(!state.previous());
        assert_eq!(state.current_index(), 0);

        assert!(state.next());
        assert!(state.next());
        assert!(state.is_last_question());
        assert!(!state.next());
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn go_to_ignores_out_of_bounds() {
        let mut state = ready_state(3);
        assert!(state.go_to(2));
        assert!(!state.go_to(3));
        assert_eq!(state.current_index(), 2);
    }

    #[test]
    fn failed_load_is_not_submittable() {
        let mut state = ready_state(2);
        state.fail_load();
        assert_eq!(state.phase(), SessionPhase::LoadFailed);
        assert!(state.questions().is_empty());
        assert!(state.current_question().is_none());
        assert!(!state.can_submit());
    }

    #[test]
    fn progress_tracks_answers() {
        let mut state = ready_state(2);
        state.select(OptionId::new("b"));
        let progress = state.progress();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert!(!progress.all_answered);
    }
}
