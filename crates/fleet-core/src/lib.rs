//! `fleet-core`: foundational types for the fleet navigation engine.
//!
//! Every other `fleet-*` crate depends on this one.  It has no `fleet-*`
//! dependencies and minimal external ones (`rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                          |
//! |-------------|---------------------------------------------------|
//! | [`ids`]     | `RobotId`, `VertexId`                             |
//! | [`geo`]     | `Point`, distance and interpolation               |
//! | [`time`]    | `Tick`                                            |
//! | [`color`]   | `RobotColor`, deterministic per robot id          |
//! | [`config`]  | `FleetConfig`                                     |
//! | [`rng`]     | `SimRng`                                          |
//! | [`error`]   | `CoreError`, `CoreResult`                         |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                 |
//! |---------|--------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.    |

pub mod color;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use color::RobotColor;
pub use config::{FleetConfig, MIN_SPEED_PER_TICK};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{RobotId, VertexId};
pub use rng::SimRng;
pub use time::Tick;
