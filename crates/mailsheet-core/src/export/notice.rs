//! Transient notices shown after an export action.

use std::time::Duration;

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    /// The action completed.
    Info,
    /// The action failed.
    Error,
}

/// A short message that dismisses itself after `duration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown to the user.
    pub message: String,
    /// Severity.
    pub level: NoticeLevel,
    /// Time until auto-dismissal.
    pub duration: Duration,
}

impl Notice {
    /// An informational notice.
    #[must_use]
    pub fn info(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Info,
            duration,
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
            duration,
        }
    }

    /// Returns `true` for error notices.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
