//! The `FleetManager` and its tick loop.

use std::collections::BTreeMap;

use log::warn;

use fleet_core::{FleetConfig, Point, RobotColor, RobotId, Tick, VertexId};
use fleet_graph::{BfsRouter, NavGraph, Router};
use fleet_robot::{Robot, RobotStatus, TickOutcome};
use fleet_traffic::{DirectedEdge, TrafficManager};

use crate::{FleetError, FleetObserver, FleetResult, LogObserver};

/// Owns the graph, every robot, and the traffic manager.
///
/// One call to [`tick`](Self::tick) advances every robot once, in ascending
/// id order.  When two robots contest a resource in the same tick, the lower
/// id asks first and wins.
///
/// Create via [`FleetBuilder`][crate::FleetBuilder].
pub struct FleetManager<R: Router = BfsRouter, O: FleetObserver = LogObserver> {
    pub(crate) config:   FleetConfig,
    pub(crate) graph:    NavGraph,
    pub(crate) traffic:  TrafficManager,
    /// Indexed by `RobotId`.
    pub(crate) robots:   Vec<Robot>,
    pub(crate) next_id:  RobotId,
    pub(crate) tick:     Tick,
    pub(crate) router:   R,
    pub(crate) observer: O,
}

impl<R: Router, O: FleetObserver> FleetManager<R, O> {
    // ── Commands ──────────────────────────────────────────────────────────

    /// Place a new `Idle` robot at `vertex` and return its id.
    ///
    /// Fails if `vertex` is not in the graph or another robot's current
    /// vertex is `vertex`.  Ids are sequential and never reused.
    pub fn spawn_robot(&mut self, vertex: VertexId) -> FleetResult<RobotId> {
        if !self.graph.contains(vertex) {
            return Err(FleetError::UnknownVertex(vertex));
        }
        if let Some(other) = self.robots.iter().find(|r| r.current() == vertex) {
            return Err(FleetError::OccupiedVertex { vertex, robot: other.id() });
        }

        let id = self.next_id;
        self.next_id = id.next();
        self.robots.push(Robot::new(id, vertex));
        self.observer.on_spawn(id, vertex);
        Ok(id)
    }

    /// Route `robot` from its current vertex to `destination`.
    ///
    /// Returns `Ok(false)` if there is no path; the robot stays as it was.
    /// A robot that is `Moving` or `Waiting` cannot be reassigned.
    pub fn assign_task(&mut self, robot: RobotId, destination: VertexId) -> FleetResult<bool> {
        let idx = self.index_of(robot)?;
        if !self.graph.contains(destination) {
            return Err(FleetError::UnknownVertex(destination));
        }
        let status = self.robots[idx].status();
        if !status.accepts_task() {
            return Err(FleetError::RobotBusy { robot, status });
        }

        let from = self.robots[idx].current();
        let path = self.router.route(&self.graph, from, destination);
        if path.is_empty() {
            self.observer.on_task_rejected(robot, from, destination);
            return Ok(false);
        }
        if let Some(&bad) = path.iter().find(|&&v| !self.graph.contains(v)) {
            return Err(FleetError::UnknownVertex(bad));
        }

        self.robots[idx].assign_task(destination, path.clone())?;
        self.observer.on_task_assigned(robot, destination, &path);
        Ok(true)
    }

    /// Advance every robot once, in ascending id order.
    ///
    /// Never fails: a robot that cannot move this tick just waits.
    pub fn tick(&mut self) {
        let now = self.tick;
        let speed = self.config.speed_per_tick;

        for idx in 0..self.robots.len() {
            let id = self.robots[idx].id();
            let was_waiting = self.robots[idx].status() == RobotStatus::Waiting;
            let outcome = self.robots[idx].tick(&mut self.traffic, speed);
            if was_waiting {
                if let TickOutcome::Advanced(edge) | TickOutcome::Arrived { edge, .. } = outcome {
                    self.observer.on_resumed(now, id, edge);
                }
            }
            match outcome {
                TickOutcome::Inactive | TickOutcome::Advanced(_) => {}
                TickOutcome::Completed(vertex) => {
                    self.observer.on_task_complete(now, id, vertex);
                }
                TickOutcome::Blocked { edge, already_waiting } => {
                    if !already_waiting {
                        self.observer.on_wait(now, id, edge);
                    }
                }
                TickOutcome::Arrived { edge, promoted, task_complete } => {
                    self.observer.on_arrival(now, id, edge.to);
                    if let Some(next) = promoted {
                        self.promote(now, next, edge);
                    }
                    if task_complete {
                        self.observer.on_task_complete(now, id, edge.to);
                    }
                }
            }
        }

        debug_assert!(
            self.traffic.check_consistency().is_ok(),
            "{:?}",
            self.traffic.check_consistency()
        );

        let (moving, waiting) = self.active_counts();
        self.observer.on_tick_end(now, moving, waiting);
        self.tick.advance();
    }

    /// Run `n` ticks.
    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Tick until no robot is `Moving` or `Waiting`, at most `limit` times.
    ///
    /// Returns the number of ticks run, or `None` if the fleet was still
    /// active after `limit` ticks.
    pub fn run_until_settled(&mut self, limit: u64) -> Option<u64> {
        for n in 0..limit {
            if self.is_settled() {
                return Some(n);
            }
            self.tick();
        }
        self.is_settled().then_some(limit)
    }

    // ── Read projections ──────────────────────────────────────────────────

    /// Render position of every robot, interpolated along its current edge.
    pub fn positions(&self) -> FleetResult<BTreeMap<RobotId, Point>> {
        self.robots
            .iter()
            .map(|r| -> FleetResult<(RobotId, Point)> { Ok((r.id(), r.position(&self.graph)?)) })
            .collect()
    }

    pub fn statuses(&self) -> BTreeMap<RobotId, RobotStatus> {
        self.robots.iter().map(|r| (r.id(), r.status())).collect()
    }

    pub fn colors(&self) -> BTreeMap<RobotId, RobotColor> {
        self.robots.iter().map(|r| (r.id(), r.color())).collect()
    }

    /// `true` if no robot has an unfinished task.
    pub fn is_settled(&self) -> bool {
        self.robots.iter().all(|r| !r.status().is_active())
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.index())
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot_count(&self) -> usize {
        self.robots.len()
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn traffic(&self) -> &TrafficManager {
        &self.traffic
    }

    pub fn config(&self) -> &FleetConfig {
        &self.config
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn index_of(&self, robot: RobotId) -> FleetResult<usize> {
        let idx = robot.index();
        if idx < self.robots.len() {
            Ok(idx)
        } else {
            Err(FleetError::UnknownRobot(robot))
        }
    }

    /// Apply the `Waiting → Moving` transition for a robot the traffic
    /// manager granted `edge` on release.
    fn promote(&mut self, now: Tick, robot: RobotId, edge: DirectedEdge) {
        let Some(target) = self.robots.get_mut(robot.index()) else {
            warn!("{now}: promoted unknown {robot} onto {edge}");
            return;
        };
        match target.promote() {
            Ok(()) => self.observer.on_promoted(now, robot, edge),
            Err(err) => warn!("{now}: {err}"),
        }
    }

    fn active_counts(&self) -> (usize, usize) {
        self.robots.iter().fold((0, 0), |(m, w), r| match r.status() {
            RobotStatus::Moving  => (m + 1, w),
            RobotStatus::Waiting => (m, w + 1),
            _ => (m, w),
        })
    }
}
