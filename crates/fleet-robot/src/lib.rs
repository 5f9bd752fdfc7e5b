//! `fleet-robot`: per-robot motion state machine.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`status`] | `RobotStatus`: `Idle`, `Moving`, `Waiting`, `TaskComplete`     |
//! | [`robot`]  | `Robot`: path, progress, transitions; `TickOutcome`            |
//! | [`error`]  | `RobotError`, `RobotResult<T>`                                  |
//!
//! # Movement model
//!
//! Each granted tick adds a fixed `speed` to the robot's progress along the
//! edge to its next path vertex.  Before every step the robot asks the
//! [`TrafficManager`][fleet_traffic::TrafficManager] for that edge:
//!
//! 1. granted: progress grows; at `1.0` the edge is released, the robot
//!    sits on the next vertex and progress resets to `0`;
//! 2. denied: the robot turns `Waiting` and asks again next tick.
//!
//! The robot never blocks.  When a release promotes a waiting robot, the
//! traffic manager reports its id and the fleet calls [`Robot::promote`].

pub mod error;
pub mod robot;
pub mod status;


pub use error::{RobotError, RobotResult};
pub use robot::{Robot, TickOutcome};
pub use status::RobotStatus;
