//! Application status lifecycle.
//!
//! There is one canonical status enum. Two HTTP routes accept different
//! spellings of it: the current route takes the capitalized five-value
//! vocabulary, the legacy job-scoped route the lowercase four-value one.
//! `hired` and `rejected` are terminal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Scheduled,
    Interviewing,
    Hired,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 6] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Scheduled,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Hired,
        ApplicationStatus::Rejected,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Scheduled => "scheduled",
            ApplicationStatus::Interviewing => "interviewing",
            ApplicationStatus::Hired => "hired",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parses the stored (lowercase) form.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Hired | ApplicationStatus::Rejected)
    }

    /// Target status if `self -> next` is allowed. Re-applying the current
    /// status is a no-op; leaving a terminal status is refused.
    pub fn transition(self, next: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
        if self == next {
            return Ok(next);
        }
        if self.is_terminal() {
            return Err(TransitionError { from: self, to: next });
        }
        Ok(next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("application is already {} and cannot move to {}", .from.as_str(), .to.as_str())]
pub struct TransitionError {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
}

/// Spelling accepted by a status-update route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusVocabulary {
    /// `Pending | Reviewed | Interviewing | Hired | Rejected`
    Review,
    /// `pending | scheduled | rejected | hired`
    Legacy,
}

impl StatusVocabulary {
    pub const fn accepted(self) -> &'static [&'static str] {
        match self {
            StatusVocabulary::Review => &["Pending", "Reviewed", "Interviewing", "Hired", "Rejected"],
            StatusVocabulary::Legacy => &["pending", "scheduled", "rejected", "hired"],
        }
    }

    pub fn parse(self, raw: &str) -> Option<ApplicationStatus> {
        let raw = raw.trim();
        if !self.accepted().contains(&raw) {
            return None;
        }
        ApplicationStatus::parse(&raw.to_lowercase())
    }
}
