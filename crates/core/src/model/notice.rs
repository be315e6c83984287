use chrono::{DateTime, Utc};

use crate::model::verdict::Verdict;

/// What a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeKind {
    /// Question generation failed; the session fell back to an empty set.
    LoadFailed,
    /// The verdict call failed; answers were kept for another attempt.
    SubmitFailed,
    /// A verdict was received.
    Verdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeSeverity {
    Info,
    Destructive,
}

/// Non-fatal, user-visible message about something the session recovered from
/// or completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub severity: NoticeSeverity,
    pub title: String,
    pub description: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    #[must_use]
    pub fn load_failed(raised_at: DateTime<Utc>) -> Self {
        Self {
            kind: NoticeKind::LoadFailed,
            severity: NoticeSeverity::Destructive,
            title: "Failed to load quiz".into(),
            description: "Using fallback questions.".into(),
            raised_at,
        }
    }

    #[must_use]
    pub fn submit_failed(raised_at: DateTime<Utc>) -> Self {
        Self {
            kind: NoticeKind::SubmitFailed,
            severity: NoticeSeverity::Destructive,
            title: "Failed to submit quiz".into(),
            description: "Please try again".into(),
            raised_at,
        }
    }

    #[must_use]
    pub fn verdict(verdict: &Verdict, raised_at: DateTime<Utc>) -> Self {
        let title = if verdict.passed {
            "Quiz Passed!"
        } else {
            "Quiz Complete"
        };
        Self {
            kind: NoticeKind::Verdict,
            severity: NoticeSeverity::Info,
            title: title.into(),
            description: verdict.message.clone(),
            raised_at,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == NoticeSeverity::Destructive
    }
}
