//! Task status state machine.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// ```text
/// ONGOING ──delay──▶ DELAYED ──delay──▶ DELAYED
///    │                  │
///    └────complete──────┴──────▶ COMPLETED (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is being worked on against its original feedback date.
    Ongoing,
    /// Task has been postponed at least once.
    Delayed,
    /// Task has been completed.
    Completed,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Ongoing, Self::Delayed, Self::Completed];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ONGOING",
            Self::Delayed => "DELAYED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns `true` when no further lifecycle transition is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` when moving from `self` to `target` is a valid
    /// transition.
    ///
    /// `DELAYED → DELAYED` is valid because a task may be postponed
    /// repeatedly. `COMPLETED` accepts nothing.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Ongoing | Self::Delayed, Self::Delayed | Self::Completed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "ONGOING" => Ok(Self::Ongoing),
            "DELAYED" => Ok(Self::Delayed),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
