/// Aggregated view of how far the learner is through the question set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub all_answered: bool,
}

impl QuizProgress {
    #[must_use]
    pub fn new(total: usize, answered: usize) -> Self {
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            all_answered: answered == total,
        }
    }
}
