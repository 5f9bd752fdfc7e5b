//! `fleet-traffic`: lane and vertex reservations for the fleet.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`edge`]    | `DirectedEdge`                                             |
//! | [`manager`] | `TrafficManager`: occupancy, claims, FIFO waiting queues  |
//! | [`error`]   | `TrafficError`, `TrafficResult<T>`                         |
//!
//! Admission is checked when a robot asks to enter an edge, so collisions
//! between moving robots are unreachable rather than detected afterwards.
//! Requests never block: a denial returns immediately and the robot tries
//! again on a later tick or is promoted when the edge frees up.
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `fx-hash` | Uses `rustc-hash`'s FxHash for all reservation maps.     |

pub mod edge;
pub mod error;
pub mod manager;

#[cfg(test)]
mod tests;

pub use edge::DirectedEdge;
pub use error::{TrafficError, TrafficResult};
pub use manager::TrafficManager;
