//! Robot status.

use std::fmt;

/// Where a robot is in its task lifecycle.
///
/// ```text
///            assign_task              path exhausted
///   Idle ───────────────▶ Moving ──────────────────▶ TaskComplete
///                          │  ▲                          │
///                   denied │  │ granted / promoted       │ assign_task
///                          ▼  │                          │
///                         Waiting            Moving ◀────┘
/// ```
///
/// There is no public setter: a robot's status only changes through
/// [`Robot`][crate::Robot]'s transition methods.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RobotStatus {
    /// At rest with no destination.  Initial state.
    #[default]
    Idle,
    /// Has pending path vertices and is advancing (or about to).
    Moving,
    /// Denied passage; retries the same edge every tick.
    Waiting,
    /// Reached its destination.  Stays here until a new task is assigned.
    TaskComplete,
}

impl RobotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RobotStatus::Idle         => "Idle",
            RobotStatus::Moving       => "Moving",
            RobotStatus::Waiting      => "Waiting",
            RobotStatus::TaskComplete => "TaskComplete",
        }
    }

    /// `true` for `Moving` and `Waiting`: the robot has an unfinished task.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, RobotStatus::Moving | RobotStatus::Waiting)
    }

    /// `true` if a new task may be assigned from this status.
    #[inline]
    pub fn accepts_task(self) -> bool {
        matches!(self, RobotStatus::Idle | RobotStatus::TaskComplete)
    }
}

impl fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
