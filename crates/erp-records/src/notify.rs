//! Dismissible notifications raised by page actions

use serde::Serialize;
use std::fmt;

/// Message shown after a successful save
pub const SAVE_SUCCEEDED: &str = "저장되었습니다";
/// Message shown after a failed save
pub const SAVE_FAILED: &str = "저장에 실패했습니다";
/// Message shown after a record is deleted
pub const DELETE_SUCCEEDED: &str = "삭제되었습니다";
/// Message shown after a failed delete
pub const DELETE_FAILED: &str = "삭제에 실패했습니다";
/// Message shown after a status change
pub const TRANSITION_SUCCEEDED: &str = "상태가 변경되었습니다";
/// Message shown after a rejected status change
pub const TRANSITION_FAILED: &str = "상태를 변경할 수 없습니다";
/// Message shown when loading fails
pub const LOAD_FAILED: &str = "데이터를 불러오는데 실패했습니다";

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation succeeded
    Success,
    /// Informational
    Info,
    /// Needs attention
    Warning,
    /// Operation failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Id used to dismiss it
    pub id: u64,
    /// Severity
    pub severity: Severity,
    /// Text
    pub message: String,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Visible notifications, oldest first
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifications {
    /// Empty queue
    pub const fn new() -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 1,
        }
    }

    /// Show a notification and return its id
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.toasts.push(Toast {
            id,
            severity,
            message: message.into(),
        });
        id
    }

    /// Show a success notification
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(Severity::Success, message)
    }

    /// Show an error notification
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(Severity::Error, message)
    }

    /// Hide a notification; `false` if it was already gone
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != before
    }

    /// Most recent notification
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// All visible notifications
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Hide everything
    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}
