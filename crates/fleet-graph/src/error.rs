//! Graph-subsystem error types.

use thiserror::Error;

use fleet_core::VertexId;

/// Problems with a graph source.  Fatal at startup.
#[derive(Debug, Error)]
pub enum GraphLoadError {
    #[error("graph source has no vertices")]
    Empty,

    #[error("lane {lane} references unknown vertex {vertex}")]
    UnknownLaneEndpoint { lane: usize, vertex: u32 },

    #[error("lane {lane} is a self-loop at {vertex}")]
    SelfLoop { lane: usize, vertex: VertexId },

    #[error("level {0:?} not found in graph source")]
    LevelNotFound(String),

    #[error("graph source declares no levels")]
    NoLevels,

    #[error("graph parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors produced by `fleet-graph` queries.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {0} not found in graph")]
    UnknownVertex(VertexId),

    #[error(transparent)]
    Load(#[from] GraphLoadError),
}

pub type GraphResult<T> = Result<T, GraphError>;
