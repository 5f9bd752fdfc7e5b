//! The `TrafficManager`: admission control for edges and vertices.
//!
//! # Reservation model
//!
//! A grant for edge `(a, b)` records two things:
//!
//! 1. **occupancy**: `(a, b) → robot`, so no other robot enters the same
//!    directed edge;
//! 2. **claim**: `b → robot`, so no other robot heads for `b` along any
//!    other edge at the same time.
//!
//! Admission also looks at the lane's other direction: `(a, b)` is denied
//! while another robot holds `(b, a)`, so two robots never meet head-on
//! mid-lane.  Robots merely resting at a vertex hold no claim.
//!
//! Denied robots queue FIFO on the edge they asked for.  Releasing an edge
//! pops at most one robot from that edge's queue and grants on its behalf.
//! A robot sits in at most one queue; asking for a different edge moves it.

use std::collections::VecDeque;

use log::trace;

use fleet_core::{RobotId, VertexId};

use crate::{DirectedEdge, TrafficError, TrafficResult};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// Reservation tables and waiting queues.
///
/// Single-owner: the fleet holds it and passes `&mut` to each robot in turn.
/// A multi-threaded driver must wrap it in a `Mutex` so each
/// `request_move` / `complete_move` call is atomic.
#[derive(Default, Debug)]
pub struct TrafficManager {
    /// Directed edge → robot currently traversing it.
    occupancy: Map<DirectedEdge, RobotId>,

    /// Vertex → robot whose active edge ends there.
    claimed: Map<VertexId, RobotId>,

    /// Per-edge FIFO of denied robots.  Empty queues are removed.
    queues: Map<DirectedEdge, VecDeque<RobotId>>,

    /// Reverse index: robot → the edge it is queued on.
    waiting_on: Map<RobotId, DirectedEdge>,

    /// Reverse index: robot → the edge it holds.
    held_by: Map<RobotId, DirectedEdge>,
}

impl TrafficManager {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Admission ─────────────────────────────────────────────────────────

    /// Ask for passage along `edge`.
    ///
    /// Granted if nobody else holds `edge` or its reverse and nobody else
    /// has claimed `edge.to`.  Re-asking for an edge the robot already holds is granted
    /// without change.  On denial the robot is queued on `edge` (once) and
    /// `false` is returned; recording the `Waiting` status is the caller's job.
    pub fn request_move(&mut self, robot: RobotId, edge: DirectedEdge) -> bool {
        if self.try_grant(robot, edge) {
            return true;
        }
        self.enqueue(robot, edge);
        false
    }

    /// Release `edge` after `robot` has crossed it, then promote the next
    /// robot queued on the same edge.
    ///
    /// Only the current holder can release; any other call (double release,
    /// wrong robot, unknown edge) is a no-op.  Returns the robot that was
    /// granted `edge` by promotion, if any.  The caller must move that
    /// robot from `Waiting` back to `Moving`.
    pub fn complete_move(&mut self, robot: RobotId, edge: DirectedEdge) -> Option<RobotId> {
        if self.occupancy.get(&edge) != Some(&robot) {
            return None;
        }
        self.occupancy.remove(&edge);
        self.held_by.remove(&robot);
        if self.claimed.get(&edge.to) == Some(&robot) {
            self.claimed.remove(&edge.to);
        }
        trace!("{robot} released {edge}");

        self.promote(edge)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Robot holding `edge`, if any.
    pub fn holder(&self, edge: DirectedEdge) -> Option<RobotId> {
        self.occupancy.get(&edge).copied()
    }

    /// Robot whose active edge ends at `vertex`, if any.
    pub fn claimant(&self, vertex: VertexId) -> Option<RobotId> {
        self.claimed.get(&vertex).copied()
    }

    /// The edge `robot` currently holds.
    pub fn held_edge(&self, robot: RobotId) -> Option<DirectedEdge> {
        self.held_by.get(&robot).copied()
    }

    /// The edge `robot` is queued on.
    pub fn waiting_edge(&self, robot: RobotId) -> Option<DirectedEdge> {
        self.waiting_on.get(&robot).copied()
    }

    /// Robots queued on `edge`, front first.
    pub fn queue(&self, edge: DirectedEdge) -> Vec<RobotId> {
        self.queues
            .get(&edge)
            .map(|q| q.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All `(edge, holder)` pairs, sorted by edge.
    pub fn occupancy(&self) -> Vec<(DirectedEdge, RobotId)> {
        let mut v: Vec<_> = self.occupancy.iter().map(|(&e, &r)| (e, r)).collect();
        v.sort_unstable();
        v
    }

    /// All `(vertex, claimant)` pairs, sorted by vertex.
    pub fn claims(&self) -> Vec<(VertexId, RobotId)> {
        let mut v: Vec<_> = self.claimed.iter().map(|(&x, &r)| (x, r)).collect();
        v.sort_unstable();
        v
    }

    pub fn occupied_count(&self) -> usize {
        self.occupancy.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting_on.len()
    }

    /// `true` if no edge is held and nobody is queued.
    pub fn is_idle(&self) -> bool {
        self.occupancy.is_empty() && self.waiting_on.is_empty()
    }

    /// Verify the reservation invariants.
    ///
    /// - every held edge is indexed under its holder, one edge per robot;
    /// - every claim matches an edge its claimant holds, and vice versa;
    /// - no lane is held in both directions at once;
    /// - every queued robot is indexed exactly once, on the right queue;
    /// - no robot is both holding an edge and queued for that same edge.
    pub fn check_consistency(&self) -> TrafficResult<()> {
        let fail = |msg: String| Err(TrafficError::Inconsistent(msg));

        if self.held_by.len() != self.occupancy.len() {
            return fail(format!(
                "{} held edges but {} holder index entries",
                self.occupancy.len(),
                self.held_by.len()
            ));
        }
        for (&edge, &robot) in &self.occupancy {
            if self.held_by.get(&robot) != Some(&edge) {
                return fail(format!("{edge} held by {robot} but not indexed under it"));
            }
            if self.claimed.get(&edge.to) != Some(&robot) {
                return fail(format!("{edge} held by {robot} without a claim on {}", edge.to));
            }
            if let Some(&other) = self.occupancy.get(&edge.reversed()) {
                return fail(format!("{edge} held by {robot} head-on against {other}"));
            }
        }
        for (&vertex, &robot) in &self.claimed {
            match self.held_by.get(&robot) {
                Some(edge) if edge.to == vertex => {}
                _ => return fail(format!("{vertex} claimed by {robot} with no edge ending there")),
            }
        }

        let queued: usize = self.queues.values().map(VecDeque::len).sum();
        if queued != self.waiting_on.len() {
            return fail(format!(
                "{queued} queue entries but {} waiting robots",
                self.waiting_on.len()
            ));
        }
        for (&edge, queue) in &self.queues {
            if queue.is_empty() {
                return fail(format!("empty queue left behind for {edge}"));
            }
            for &robot in queue {
                if self.waiting_on.get(&robot) != Some(&edge) {
                    return fail(format!("{robot} in queue for {edge} but indexed elsewhere"));
                }
                if self.held_by.get(&robot) == Some(&edge) {
                    return fail(format!("{robot} holds {edge} while queued for it"));
                }
            }
        }
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Grant `edge` to `robot` if the reservation rules allow it.  Never
    /// queues.
    fn try_grant(&mut self, robot: RobotId, edge: DirectedEdge) -> bool {
        match self.occupancy.get(&edge) {
            Some(&holder) if holder == robot => return true,
            Some(&holder) => {
                trace!("{robot} denied {edge}: held by {holder}");
                return false;
            }
            None => {}
        }
        if let Some(&oncoming) = self.occupancy.get(&edge.reversed()) {
            trace!("{robot} denied {edge}: {oncoming} coming the other way");
            return false;
        }
        match self.claimed.get(&edge.to) {
            Some(&claimant) if claimant != robot => {
                trace!("{robot} denied {edge}: {} claimed by {claimant}", edge.to);
                return false;
            }
            _ => {}
        }
        if let Some(&other) = self.held_by.get(&robot) {
            trace!("{robot} denied {edge}: still holds {other}");
            return false;
        }

        self.occupancy.insert(edge, robot);
        self.claimed.insert(edge.to, robot);
        self.held_by.insert(robot, edge);
        self.dequeue(robot);
        trace!("{robot} granted {edge}");
        true
    }

    /// Queue `robot` on `edge`, leaving any other queue first.  Idempotent.
    fn enqueue(&mut self, robot: RobotId, edge: DirectedEdge) {
        match self.waiting_on.get(&robot) {
            Some(&current) if current == edge => return,
            Some(_) => self.dequeue(robot),
            None => {}
        }
        self.queues.entry(edge).or_default().push_back(robot);
        self.waiting_on.insert(robot, edge);
    }

    /// Remove `robot` from whatever queue it is in.
    fn dequeue(&mut self, robot: RobotId) {
        let Some(edge) = self.waiting_on.remove(&robot) else {
            return;
        };
        if let Some(queue) = self.queues.get_mut(&edge) {
            queue.retain(|&r| r != robot);
            if queue.is_empty() {
                self.queues.remove(&edge);
            }
        }
    }

    /// Take the front of `edge`'s queue and try to grant on its behalf.
    ///
    /// If the grant still fails (the robot still holds another edge), it
    /// stays at the front and keeps its place.
    fn promote(&mut self, edge: DirectedEdge) -> Option<RobotId> {
        let next = *self.queues.get(&edge)?.front()?;
        if self.try_grant(next, edge) {
            trace!("{next} promoted onto {edge}");
            Some(next)
        } else {
            None
        }
    }
}
