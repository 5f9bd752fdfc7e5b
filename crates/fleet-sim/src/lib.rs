//! `fleet-sim`: fleet orchestration and the tick loop.
//!
//! # Tick loop
//!
//! ```text
//! for robot in robots (ascending RobotId):
//!   ① Moving/Waiting robots ask the TrafficManager for (current, next).
//!   ② Granted  → progress += speed_per_tick; at 1.0 release the edge,
//!                step onto `next`, and promote whoever queued behind.
//!      Denied   → Waiting; retried next tick.
//!   ③ Observer hooks fire for waits and their end (promoted or resumed),
//!      then for arrivals and completions.
//! ```
//!
//! Ascending id order is the only tie-break: with identical inputs, a run
//! is fully reproducible.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                  |
//! |-----------|---------------------------------------------------------|
//! | `fx-hash` | FxHash for the traffic manager's reservation maps.      |
//! | `serde`   | Serde derives on config, ids and statuses.              |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fleet_core::VertexId;
//! use fleet_sim::{FleetBuilder, NoopObserver};
//!
//! let graph = fleet_graph::load_graph_str(json, None)?;
//! let mut fleet = FleetBuilder::new(graph).observer(NoopObserver).build()?;
//! let robot = fleet.spawn_robot(VertexId(0))?;
//! fleet.assign_task(robot, VertexId(2))?;
//! fleet.run_until_settled(1_000);
//! ```

pub mod builder;
pub mod error;
pub mod fleet;
pub mod observer;


pub use builder::FleetBuilder;
pub use error::{FleetError, FleetResult};
pub use fleet::FleetManager;
pub use observer::{FleetObserver, LogObserver, NoopObserver};
