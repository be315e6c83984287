//! Values derived from a question set and the learner's answers.
//!
//! Nothing here is cached: callers recompute on every read so the result
//! always matches the current answers.

use crate::model::{AnswerMap, Question};

/// Number of questions whose stored answer equals the correct answer.
#[must_use]
pub fn score(questions: &[Question], answers: &AnswerMap) -> usize {
    questions
        .iter()
        .filter(|q| answers.get(q.id()).is_some_and(|a| q.is_correct(a)))
        .count()
}

/// True when every question in the set has a selection.
///
/// Only presence is checked, not correctness.
#[must_use]
pub fn all_answered(questions: &[Question], answers: &AnswerMap) -> bool {
    answers.len() == questions.len()
}

/// Number of questions in the set that have a selection.
#[must_use]
pub fn answered_count(questions: &[Question], answers: &AnswerMap) -> usize {
    questions.iter().filter(|q| answers.contains(q.id())).count()
}

/// Whole-number percentage of `score` over `total`; 0 for an empty set.
#[must_use]
pub fn percent(score: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = score.min(total).saturating_mul(100) / total;
    u8::try_from(pct).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, OptionId, QuestionId};

    fn question(id: &str, correct: &str) -> Question {
        Question::new(
            id,
            format!("Question {id}"),
            vec![
                AnswerOption::new("a", "A"),
                AnswerOption::new("b", "B"),
                AnswerOption::new("c", "C"),
            ],
            correct,
        )
        .unwrap()
    }

    fn five() -> Vec<Question> {
        (1..=5).map(|i| question(&format!("q{i}"), "a")).collect()
    }

    #[test]
    fn score_counts_correct_answers_only() {
        let questions = five();
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new("q1"), OptionId::new("a"));
        answers.select(QuestionId::new("q2"), OptionId::new("b"));
        answers.select(QuestionId::new("q3"), OptionId::new("a"));

        assert_eq!(score(&questions, &answers), 2);
    }

    #[test]
    fn wrong_then_right_updates_score() {
        let questions = five();
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new("q1"), OptionId::new("c"));
        assert_eq!(score(&questions, &answers), 0);

        answers.select(QuestionId::new("q1"), OptionId::new("a"));
        assert_eq!(score(&questions, &answers), 1);
    }

    #[test]
    fn all_answered_requires_every_question() {
        let questions = five();
        let mut answers = AnswerMap::new();
        for i in 1..=5 {
            assert!(!all_answered(&questions, &answers));
            answers.select(QuestionId::new(format!("q{i}")), OptionId::new("b"));
        }
        assert!(all_answered(&questions, &answers));
        assert_eq!(answered_count(&questions, &answers), 5);
        assert_eq!(score(&questions, &answers), 0);
    }

    #[test]
    fn reselecting_does_not_count_twice() {
        let questions = five();
        let mut answers = AnswerMap::new();
        for _ in 0..5 {
            answers.select(QuestionId::new("q1"), OptionId::new("a"));
        }
        assert!(!all_answered(&questions, &answers));
        assert_eq!(answered_count(&questions, &answers), 1);
    }

    #[test]
    fn percent_handles_empty_and_full() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(3, 5), 60);
        assert_eq!(percent(5, 5), 100);
    }
}
