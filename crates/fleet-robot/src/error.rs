use fleet_core::{RobotId, VertexId};
use thiserror::Error;

use crate::RobotStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RobotError {
    #[error("{robot}: cannot {event} while {from}")]
    InvalidTransition {
        robot: RobotId,
        from:  RobotStatus,
        event: &'static str,
    },

    #[error("{0}: assigned path is empty")]
    EmptyPath(RobotId),

    #[error("{robot}: path starts at {got} but robot is at {expected}")]
    PathDoesNotStartAtCurrent {
        robot:    RobotId,
        expected: VertexId,
        got:      VertexId,
    },
}

pub type RobotResult<T> = Result<T, RobotError>;
