//! Fleet observer trait: the injected sink for fleet events.

use log::{debug, info, trace, warn};

use fleet_core::{RobotId, Tick, VertexId};
use fleet_traffic::DirectedEdge;

/// Callbacks invoked by [`FleetManager`][crate::FleetManager] as things
/// happen.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  The observer is handed to the fleet at
/// construction and is the only channel fleet events are reported through.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct Arrivals(usize);
///
/// impl FleetObserver for Arrivals {
///     fn on_arrival(&mut self, _tick: Tick, _robot: RobotId, _vertex: VertexId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait FleetObserver {
    /// A robot was placed on the graph.
    fn on_spawn(&mut self, _robot: RobotId, _vertex: VertexId) {}

    /// A task was accepted.  `path` includes the robot's current vertex.
    fn on_task_assigned(&mut self, _robot: RobotId, _destination: VertexId, _path: &[VertexId]) {}

    /// No path exists from `from` to `destination`; the robot is untouched.
    fn on_task_rejected(&mut self, _robot: RobotId, _from: VertexId, _destination: VertexId) {}

    /// A robot was denied `edge` and started waiting.  Not repeated for
    /// retries while it keeps waiting.
    fn on_wait(&mut self, _tick: Tick, _robot: RobotId, _edge: DirectedEdge) {}

    /// A waiting robot was granted `edge` when its previous holder released it.
    fn on_promoted(&mut self, _tick: Tick, _robot: RobotId, _edge: DirectedEdge) {}

    /// A waiting robot was granted `edge` on its own retry.  Every wait ends
    /// in exactly one of `on_promoted` or `on_resumed`.
    fn on_resumed(&mut self, _tick: Tick, _robot: RobotId, _edge: DirectedEdge) {}

    /// A robot reached `vertex` at the end of an edge.
    fn on_arrival(&mut self, _tick: Tick, _robot: RobotId, _vertex: VertexId) {}

    /// A robot finished its task at `vertex`.
    fn on_task_complete(&mut self, _tick: Tick, _robot: RobotId, _vertex: VertexId) {}

    /// Called once at the end of every tick.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize, _waiting: usize) {}
}

/// A [`FleetObserver`] that does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopObserver;

impl FleetObserver for NoopObserver {}

/// Forwards every event to the [`log`] facade.  The sink is whatever logger
/// the application installs.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogObserver;

impl FleetObserver for LogObserver {
    fn on_spawn(&mut self, robot: RobotId, vertex: VertexId) {
        info!("spawned {robot} at {vertex}");
    }

    fn on_task_assigned(&mut self, robot: RobotId, destination: VertexId, path: &[VertexId]) {
        let hops: Vec<String> = path.iter().map(ToString::to_string).collect();
        info!("{robot} assigned to {destination}, path [{}]", hops.join(", "));
    }

    fn on_task_rejected(&mut self, robot: RobotId, from: VertexId, destination: VertexId) {
        warn!("{robot}: no path from {from} to {destination}, task rejected");
    }

    fn on_wait(&mut self, tick: Tick, robot: RobotId, edge: DirectedEdge) {
        info!("{tick}: {robot} waiting for {edge}");
    }

    fn on_promoted(&mut self, tick: Tick, robot: RobotId, edge: DirectedEdge) {
        debug!("{tick}: {robot} promoted onto {edge}");
    }

    fn on_resumed(&mut self, tick: Tick, robot: RobotId, edge: DirectedEdge) {
        info!("{tick}: {robot} resumed on {edge}");
    }

    fn on_arrival(&mut self, tick: Tick, robot: RobotId, vertex: VertexId) {
        debug!("{tick}: {robot} reached {vertex}");
    }

    fn on_task_complete(&mut self, tick: Tick, robot: RobotId, vertex: VertexId) {
        info!("{tick}: {robot} completed task at {vertex}");
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize, waiting: usize) {
        trace!("{tick} done: {moving} moving, {waiting} waiting");
    }
}
