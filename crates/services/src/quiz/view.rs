use quiz_core::model::{OptionId, PassPolicy, QuestionId, Verdict};
use quiz_core::scoring;

use super::progress::QuizProgress;
use super::state::{SessionPhase, SessionState};

/// Presentation-agnostic snapshot of a quiz session.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no styling decisions
///
/// Renderers read it and send intents back through the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub topic: Option<String>,
    pub phase: SessionPhase,
    pub loading: bool,
    pub submitting: bool,
    pub current: Option<QuestionView>,
    pub progress: QuizProgress,
    pub can_go_previous: bool,
    pub can_go_next: bool,
    pub is_last_question: bool,
    pub can_submit: bool,
    pub result: Option<ResultView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub id: QuestionId,
    /// 1-based position in the set.
    pub number: usize,
    pub total: usize,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub selected: Option<OptionId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub id: OptionId,
    pub text: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub score: usize,
    pub total: usize,
    pub percent: u8,
    /// Outcome under the local pass policy; the verdict carries the service's.
    pub passed_locally: bool,
    pub verdict: Verdict,
}

impl QuizView {
    #[must_use]
    pub fn from_state(state: &SessionState, policy: PassPolicy) -> Self {
        let total = state.questions().len();
        let selected = state.selected_for_current();
        let current = state.current_question().map(|q| QuestionView {
            id: q.id().clone(),
            number: state.current_index() + 1,
            total,
            prompt: q.prompt().to_string(),
            options: q
                .options()
                .iter()
                .map(|o| OptionView {
                    id: o.id.clone(),
                    text: o.text.clone(),
                    selected: selected == Some(&o.id),
                })
                .collect(),
            selected: selected.cloned(),
        });

        let result = match (state.phase(), state.result()) {
            (SessionPhase::Result, Some(verdict)) => {
                let score = state.score();
                Some(ResultView {
                    score,
                    total,
                    percent: scoring::percent(score, total),
                    passed_locally: policy.passes(score),
                    verdict: verdict.clone(),
                })
            }
            _ => None,
        };

        let has_questions = total > 0;
        Self {
            topic: state.topic().map(ToString::to_string),
            phase: state.phase(),
            loading: state.is_loading(),
            submitting: state.is_submitting(),
            current,
            progress: state.progress(),
            can_go_previous: state.current_index() > 0,
            can_go_next: has_questions && state.current_index() + 1 < total,
            is_last_question: state.is_last_question(),
            can_submit: state.can_submit(),
            result,
        }
    }

    /// True when the current question should be hidden behind a loading
    /// placeholder.
    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.loading || self.current.is_none()
    }
}
