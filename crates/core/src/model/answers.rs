use std::collections::HashMap;

use crate::model::ids::{OptionId, QuestionId};

/// Learner selections keyed by question id. The last selection for a
/// question replaces any earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    selections: HashMap<QuestionId, OptionId>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a selection, returning the previously selected option if any.
    pub fn select(&mut self, question: QuestionId, option: OptionId) -> Option<OptionId> {
        self.selections.insert(question, option)
    }

    #[must_use]
    pub fn get(&self, question: &QuestionId) -> Option<&OptionId> {
        self.selections.get(question)
    }

    #[must_use]
    pub fn contains(&self, question: &QuestionId) -> bool {
        self.selections.contains_key(question)
    }

    /// Number of distinct questions with a selection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn clear(&mut self) {
        self.selections.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &OptionId)> {
        self.selections.iter()
    }
}
