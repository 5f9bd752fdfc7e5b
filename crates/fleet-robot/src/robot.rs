//! A single robot: position on the graph, remaining path, and the status
//! machine that drives it one tick at a time.

use std::collections::VecDeque;

use log::trace;

use fleet_core::{Point, RobotColor, RobotId, VertexId};
use fleet_graph::{GraphResult, NavGraph};
use fleet_traffic::{DirectedEdge, TrafficManager};

use crate::{RobotError, RobotResult, RobotStatus};

/// Slack for accumulated `f32` progress, so ten steps of `0.1` count as a
/// full edge.
const ARRIVAL_EPSILON: f32 = 1e-4;

/// What one call to [`Robot::tick`] did.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum TickOutcome {
    /// Robot was `Idle` or `TaskComplete`; nothing happened.
    Inactive,

    /// Pending path was already empty; the robot switched to `TaskComplete`
    /// at this vertex.
    Completed(VertexId),

    /// Granted `edge` and moved along it without reaching the end.
    Advanced(DirectedEdge),

    /// Denied `edge`.  `already_waiting` is `false` on the first denial of a
    /// wait and `true` on every retry after it.
    Blocked { edge: DirectedEdge, already_waiting: bool },

    /// Reached the end of `edge` and released it.
    ///
    /// `promoted` is the robot the traffic manager granted `edge` to next;
    /// the caller must call [`Robot::promote`] on it.
    Arrived {
        edge:          DirectedEdge,
        promoted:      Option<RobotId>,
        task_complete: bool,
    },
}

/// One robot of the fleet.
///
/// Fields are private so the status can only change through
/// [`assign_task`](Self::assign_task), [`tick`](Self::tick) and
/// [`promote`](Self::promote).
#[derive(Clone, Debug)]
pub struct Robot {
    id:          RobotId,
    current:     VertexId,
    destination: Option<VertexId>,
    /// Remaining path, current vertex excluded.
    pending:     VecDeque<VertexId>,
    /// Fraction of the edge `current → pending[0]` covered, in `[0, 1)`.
    progress:    f32,
    status:      RobotStatus,
    color:       RobotColor,
}

impl Robot {
    /// An `Idle` robot resting at `vertex`.
    pub fn new(id: RobotId, vertex: VertexId) -> Self {
        Self {
            id,
            current:     vertex,
            destination: None,
            pending:     VecDeque::new(),
            progress:    0.0,
            status:      RobotStatus::Idle,
            color:       RobotColor::for_robot(id),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> RobotId {
        self.id
    }

    #[inline]
    pub fn current(&self) -> VertexId {
        self.current
    }

    #[inline]
    pub fn destination(&self) -> Option<VertexId> {
        self.destination
    }

    #[inline]
    pub fn status(&self) -> RobotStatus {
        self.status
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn color(&self) -> RobotColor {
        self.color
    }

    /// Vertices still to visit, in order, current vertex excluded.
    pub fn pending(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        self.pending.iter().copied()
    }

    /// The vertex at the far end of the edge the robot is on or waiting for.
    pub fn next_vertex(&self) -> Option<VertexId> {
        self.pending.front().copied()
    }

    /// The edge the robot is traversing or waiting for.
    pub fn next_edge(&self) -> Option<DirectedEdge> {
        self.next_vertex().map(|n| DirectedEdge::new(self.current, n))
    }

    /// Render position: the current vertex at rest, otherwise linearly
    /// interpolated toward the next vertex by `progress`.
    pub fn position(&self, graph: &NavGraph) -> GraphResult<Point> {
        let here = graph.position(self.current)?;
        match self.next_vertex() {
            Some(next) if self.progress > 0.0 => {
                Ok(here.lerp(graph.position(next)?, f64::from(self.progress)))
            }
            _ => Ok(here),
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Start a new task.
    ///
    /// `path` must be non-empty and begin at the current vertex; a
    /// single-vertex path completes on the next tick.  Only allowed from
    /// `Idle` or `TaskComplete`.  On error the robot is unchanged.
    pub fn assign_task(&mut self, destination: VertexId, path: Vec<VertexId>) -> RobotResult<()> {
        if !self.status.accepts_task() {
            return Err(self.invalid("assign_task"));
        }
        let mut path = VecDeque::from(path);
        match path.pop_front() {
            None => return Err(RobotError::EmptyPath(self.id)),
            Some(first) if first != self.current => {
                return Err(RobotError::PathDoesNotStartAtCurrent {
                    robot:    self.id,
                    expected: self.current,
                    got:      first,
                });
            }
            Some(_) => {}
        }

        self.destination = Some(destination);
        self.pending     = path;
        self.progress    = 0.0;
        self.status      = RobotStatus::Moving;
        Ok(())
    }

    /// Advance one tick.
    ///
    /// Only `Moving` and `Waiting` robots act.  The robot asks `traffic` for
    /// the edge to its next vertex and, if granted, covers `speed` of it.
    /// Crossing the end releases the edge and moves `current` forward.
    pub fn tick(&mut self, traffic: &mut TrafficManager, speed: f32) -> TickOutcome {
        if !self.status.is_active() {
            return TickOutcome::Inactive;
        }
        let Some(edge) = self.next_edge() else {
            self.status = RobotStatus::TaskComplete;
            return TickOutcome::Completed(self.current);
        };

        if !traffic.request_move(self.id, edge) {
            let already_waiting = self.status == RobotStatus::Waiting;
            self.status = RobotStatus::Waiting;
            return TickOutcome::Blocked { edge, already_waiting };
        }

        self.status = RobotStatus::Moving;
        self.progress += speed;
        if self.progress + ARRIVAL_EPSILON < 1.0 {
            trace!("{} on {edge}: {:.2}", self.id, self.progress);
            return TickOutcome::Advanced(edge);
        }

        let promoted = traffic.complete_move(self.id, edge);
        self.current  = edge.to;
        self.pending.pop_front();
        self.progress = 0.0;

        let task_complete = self.pending.is_empty();
        if task_complete {
            self.status = RobotStatus::TaskComplete;
        }
        TickOutcome::Arrived { edge, promoted, task_complete }
    }

    /// `Waiting → Moving`, applied when the traffic manager has granted this
    /// robot its edge on release by another robot.
    pub fn promote(&mut self) -> RobotResult<()> {
        if self.status != RobotStatus::Waiting {
            return Err(self.invalid("promote"));
        }
        self.status = RobotStatus::Moving;
        Ok(())
    }

    fn invalid(&self, event: &'static str) -> RobotError {
        RobotError::InvalidTransition {
            robot: self.id,
            from:  self.status,
            event,
        }
    }
}
