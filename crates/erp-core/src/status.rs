//! Closed status enumerations and their transition tables
//!
//! Every record carries one status drawn from a closed set. The set doubles as
//! a lookup for the chip label and colour shown in list views, and each value
//! lists the statuses it may move to. A transition outside that list is
//! rejected by the record engine instead of being written through.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{fmt, hash::Hash, str::FromStr};

/// Chip colour used when rendering a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChipColor {
    /// Neutral grey
    Default,
    /// Brand colour
    Primary,
    /// Informational blue
    Info,
    /// Green
    Success,
    /// Amber
    Warning,
    /// Red
    Error,
}

impl fmt::Display for ChipColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Primary => "primary",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Error returned when a string is not a member of a status enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus {
    /// The rejected input
    pub value: String,
    /// Accepted values
    pub expected: &'static [&'static str],
}

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown status '{}', expected one of: {}",
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for UnknownStatus {}

/// A closed status enumeration with a transition table
pub trait Status:
    Copy
    + Eq
    + Hash
    + fmt::Debug
    + fmt::Display
    + FromStr<Err = UnknownStatus>
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    /// Every member, in dropdown order
    const ALL: &'static [Self];

    /// Wire name
    fn as_str(self) -> &'static str;

    /// Display label
    fn label(self) -> &'static str;

    /// Chip colour
    fn color(self) -> ChipColor;

    /// Statuses reachable from this one
    fn transitions(self) -> &'static [Self];

    /// Verb shown on the row action that moves a record into `self`
    fn action(self) -> &'static str;

    /// Whether `next` is reachable in one step
    fn can_transition_to(self, next: Self) -> bool {
        self.transitions().contains(&next)
    }

    /// Whether no further transitions exist
    fn is_terminal(self) -> bool {
        self.transitions().is_empty()
    }
}

macro_rules! status_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            const NAMES: &'static [&'static str] = &[$($name),+];

            const fn wire_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(Status::as_str(*self))
            }
        }

        impl FromStr for $ty {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    other => Err(UnknownStatus {
                        value: other.to_string(),
                        expected: Self::NAMES,
                    }),
                }
            }
        }
    };
}

/// Invoice lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Being written
    #[default]
    Draft,
    /// Sent to the customer
    Sent,
    /// Settled
    Paid,
    /// Past due date without payment
    Overdue,
    /// Voided
    Cancelled,
}

status_names!(InvoiceStatus {
    Draft => "draft",
    Sent => "sent",
    Paid => "paid",
    Overdue => "overdue",
    Cancelled => "cancelled",
});

impl Status for InvoiceStatus {
    const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Sent,
        Self::Paid,
        Self::Overdue,
        Self::Cancelled,
    ];

    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Draft => "임시저장",
            Self::Sent => "발송됨",
            Self::Paid => "결제완료",
            Self::Overdue => "연체",
            Self::Cancelled => "취소",
        }
    }

    fn color(self) -> ChipColor {
        match self {
            Self::Draft => ChipColor::Default,
            Self::Sent => ChipColor::Info,
            Self::Paid => ChipColor::Success,
            Self::Overdue => ChipColor::Error,
            Self::Cancelled => ChipColor::Warning,
        }
    }

    fn transitions(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Sent, Self::Cancelled],
            Self::Sent => &[Self::Paid, Self::Overdue, Self::Cancelled],
            Self::Overdue => &[Self::Paid, Self::Cancelled],
            Self::Paid | Self::Cancelled => &[],
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Draft => "revert",
            Self::Sent => "send",
            Self::Paid => "confirm",
            Self::Overdue => "mark_overdue",
            Self::Cancelled => "cancel",
        }
    }
}

/// Fixed asset state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    /// Assigned and in service
    #[default]
    InUse,
    /// Available but unassigned
    Idle,
    /// Out for repair
    Repair,
    /// Written off
    Disposed,
}

status_names!(AssetStatus {
    InUse => "in_use",
    Idle => "idle",
    Repair => "repair",
    Disposed => "disposed",
});

impl Status for AssetStatus {
    const ALL: &'static [Self] = &[Self::InUse, Self::Idle, Self::Repair, Self::Disposed];

    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            Self::InUse => "사용중",
            Self::Idle => "유휴",
            Self::Repair => "수리중",
            Self::Disposed => "폐기",
        }
    }

    fn color(self) -> ChipColor {
        match self {
            Self::InUse => ChipColor::Success,
            Self::Idle => ChipColor::Default,
            Self::Repair => ChipColor::Warning,
            Self::Disposed => ChipColor::Error,
        }
    }

    fn transitions(self) -> &'static [Self] {
        match self {
            Self::InUse => &[Self::Idle, Self::Repair, Self::Disposed],
            Self::Idle => &[Self::InUse, Self::Repair, Self::Disposed],
            Self::Repair => &[Self::InUse, Self::Idle, Self::Disposed],
            Self::Disposed => &[],
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::InUse => "assign",
            Self::Idle => "release",
            Self::Repair => "send_to_repair",
            Self::Disposed => "dispose",
        }
    }
}

/// Notice board post state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeStatus {
    /// Not yet visible
    #[default]
    Draft,
    /// Visible on the board
    Published,
    /// Hidden from the board
    Archived,
}

status_names!(NoticeStatus {
    Draft => "draft",
    Published => "published",
    Archived => "archived",
});

impl Status for NoticeStatus {
    const ALL: &'static [Self] = &[Self::Draft, Self::Published, Self::Archived];

    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Draft => "임시저장",
            Self::Published => "게시중",
            Self::Archived => "보관",
        }
    }

    fn color(self) -> ChipColor {
        match self {
            Self::Draft => ChipColor::Default,
            Self::Published => ChipColor::Success,
            Self::Archived => ChipColor::Warning,
        }
    }

    fn transitions(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Published],
            Self::Published => &[Self::Archived],
            Self::Archived => &[Self::Published],
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Draft => "unpublish",
            Self::Published => "publish",
            Self::Archived => "archive",
        }
    }
}

/// Backup job run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupStatus {
    /// Waiting for its next run
    #[default]
    Scheduled,
    /// Currently executing
    Running,
    /// Last run succeeded
    Completed,
    /// Last run failed
    Failed,
}

status_names!(BackupStatus {
    Scheduled => "scheduled",
    Running => "running",
    Completed => "completed",
    Failed => "failed",
});

impl Status for BackupStatus {
    const ALL: &'static [Self] = &[
        Self::Scheduled,
        Self::Running,
        Self::Completed,
        Self::Failed,
    ];

    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "예약됨",
            Self::Running => "실행중",
            Self::Completed => "완료",
            Self::Failed => "실패",
        }
    }

    fn color(self) -> ChipColor {
        match self {
            Self::Scheduled => ChipColor::Default,
            Self::Running => ChipColor::Info,
            Self::Completed => ChipColor::Success,
            Self::Failed => ChipColor::Error,
        }
    }

    fn transitions(self) -> &'static [Self] {
        match self {
            Self::Scheduled => &[Self::Running],
            Self::Running => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[Self::Scheduled],
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Scheduled => "reschedule",
            Self::Running => "run",
            Self::Completed => "complete",
            Self::Failed => "fail",
        }
    }
}

/// Approval document state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Being written by the requester
    #[default]
    Draft,
    /// Waiting on approvers
    Submitted,
    /// Accepted
    Approved,
    /// Turned down
    Rejected,
}

status_names!(ApprovalStatus {
    Draft => "draft",
    Submitted => "submitted",
    Approved => "approved",
    Rejected => "rejected",
});

impl Status for ApprovalStatus {
    const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
    ];

    fn as_str(self) -> &'static str {
        self.wire_name()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Draft => "작성중",
            Self::Submitted => "결재대기",
            Self::Approved => "승인",
            Self::Rejected => "반려",
        }
    }

    fn color(self) -> ChipColor {
        match self {
            Self::Draft => ChipColor::Default,
            Self::Submitted => ChipColor::Warning,
            Self::Approved => ChipColor::Success,
            Self::Rejected => ChipColor::Error,
        }
    }

    fn transitions(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::Submitted => &[Self::Approved, Self::Rejected],
            Self::Approved | Self::Rejected => &[],
        }
    }

    fn action(self) -> &'static str {
        match self {
            Self::Draft => "withdraw",
            Self::Submitted => "submit",
            Self::Approved => "approve",
            Self::Rejected => "reject",
        }
    }
}

/// Decision recorded on one approval step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDecision {
    /// Not decided yet
    #[default]
    Pending,
    /// Approved by this approver
    Approved,
    /// Rejected by this approver
    Rejected,
}
