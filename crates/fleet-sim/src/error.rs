use fleet_core::{CoreError, RobotId, VertexId};
use fleet_graph::GraphError;
use fleet_robot::{RobotError, RobotStatus};
use thiserror::Error;

/// Recoverable per-operation failures.  None of these leave the fleet in a
/// changed state.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("vertex {0} not found in graph")]
    UnknownVertex(VertexId),

    #[error("vertex {vertex} is already occupied by {robot}")]
    OccupiedVertex { vertex: VertexId, robot: RobotId },

    #[error("no such robot: {0}")]
    UnknownRobot(RobotId),

    #[error("{robot} is {status} and cannot take a new task")]
    RobotBusy { robot: RobotId, status: RobotStatus },

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Robot(#[from] RobotError),

    #[error("fleet configuration error: {0}")]
    Config(#[from] CoreError),
}

pub type FleetResult<T> = Result<T, FleetError>;
