use std::fmt;

use quiz_core::model::{Notice, NoticeSeverity};
use services::quiz::{QuizView, SessionPhase};

/// Terminal rendering of a quiz view.
pub struct Screen<'a>(pub &'a QuizView);

impl fmt::Display for Screen<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        if let Some(topic) = &view.topic {
            writeln!(f, "== {topic} ==")?;
        }

        match view.phase {
            SessionPhase::Idle => return writeln!(f, "No quiz loaded. Use `t <topic>` to start."),
            SessionPhase::Loading => return writeln!(f, "Generating questions..."),
            SessionPhase::LoadFailed => {
                return writeln!(f, "No questions available. Use `t <topic>` to try again.");
            }
            SessionPhase::Result => {
                if let Some(result) = &view.result {
                    let heading = if result.verdict.passed {
                        "Quiz Passed!"
                    } else {
                        "Quiz Complete"
                    };
                    writeln!(f, "{heading}")?;
                    writeln!(
                        f,
                        "Score: {}/{} ({}%)",
                        result.score, result.total, result.percent
                    )?;
                    writeln!(f, "{}", result.verdict.message)?;
                    return writeln!(f, "Type `r` to try again or `t <topic>` for a new quiz.");
                }
            }
            SessionPhase::Ready | SessionPhase::Submitting => {}
        }

        let Some(question) = &view.current else {
            return writeln!(f, "No current question.");
        };

        writeln!(f, "Question {} of {}", question.number, question.total)?;
        writeln!(f, "{}", question.prompt)?;
        for (idx, option) in question.options.iter().enumerate() {
            let mark = if option.selected { '*' } else { ' ' };
            writeln!(f, " {mark} {}. [{}] {}", idx + 1, option.id, option.text)?;
        }

        let progress = view.progress;
        write!(f, "Answered {}/{}", progress.answered, progress.total)?;
        if view.submitting {
            write!(f, " | submitting...")?;
        } else if view.can_submit {
            write!(f, " | ready to submit (`s`)")?;
        } else if view.is_last_question && !progress.all_answered {
            write!(f, " | {} unanswered", progress.remaining)?;
        }
        writeln!(f)
    }
}

/// One notice, as a single line.
pub struct NoticeLine<'a>(pub &'a Notice);

impl fmt::Display for NoticeLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notice = self.0;
        let marker = match notice.severity {
            NoticeSeverity::Destructive => "!",
            NoticeSeverity::Info => "i",
        };
        write!(f, "[{marker}] {}: {}", notice.title, notice.description)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quiz_core::model::{AnswerOption, OptionId, Question, Topic, Verdict};
    use quiz_core::time::{fixed_clock, fixed_now};
    use services::{
        LocalVerdictRecorder, NoticeLog, QuizSessionController, StaticQuestionGenerator,
    };

    use super::*;

    fn controller(questions: Vec<Question>) -> QuizSessionController {
        QuizSessionController::new(
            fixed_clock(),
            Arc::new(StaticQuestionGenerator::new(questions)),
            Arc::new(LocalVerdictRecorder::default()),
            Arc::new(NoticeLog::new()),
        )
    }

    fn question(id: &str) -> Question {
        Question::new(
            id,
            "Which way does the pitch shift as a source approaches?",
            vec![AnswerOption::new("a", "Up"), AnswerOption::new("b", "Down")],
            "a",
        )
        .unwrap()
    }

    #[test]
    fn idle_screen_prompts_for_topic() {
        let view = controller(Vec::new()).view();
        assert!(Screen(&view).to_string().contains("No quiz loaded"));
    }

    #[tokio::test]
    async fn ready_screen_marks_selection_and_progress() {
        let mut controller = controller(vec![question("q1"), question("q2")]);
        controller
            .activate(Topic::parse("Doppler Effect").unwrap(), None)
            .await;
        controller.select_option(OptionId::new("b")).unwrap();

        let text = Screen(&controller.view()).to_string();

        assert!(text.starts_with("== Doppler Effect =="));
        assert!(text.contains("Question 1 of 2"));
        assert!(text.contains(" * 2. [b] Down"));
        assert!(text.contains("   1. [a] Up"));
        assert!(text.contains("Answered 1/2"));
    }

    #[tokio::test]
    async fn result_screen_shows_score_and_message() {
        let mut controller = controller(vec![question("q1")]);
        controller
            .activate(Topic::parse("Doppler Effect").unwrap(), None)
            .await;
        controller.select_option(OptionId::new("a")).unwrap();
        controller.submit().await.unwrap();

        let text = Screen(&controller.view()).to_string();

        assert!(text.contains("Quiz Complete"));
        assert!(text.contains("Score: 1/1 (100%)"));
        assert!(text.contains("You scored 1/1 on Doppler Effect."));
    }

    #[test]
    fn notice_line_marks_severity() {
        let failed = Notice::submit_failed(fixed_now());
        assert_eq!(
            NoticeLine(&failed).to_string(),
            "[!] Failed to submit quiz: Please try again"
        );

        let passed = Notice::verdict(&Verdict::new(true, "Great work"), fixed_now());
        assert_eq!(
            NoticeLine(&passed).to_string(),
            "[i] Quiz Passed!: Great work"
        );
    }
}
