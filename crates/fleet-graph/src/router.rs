//! Routing trait and the default breadth-first implementation.
//!
//! # Pluggability
//!
//! `fleet-sim` plans tasks through the [`Router`] trait, so applications can
//! swap in other strategies (congestion-aware, charger-avoiding) without
//! touching the fleet core.  Every lane costs 1, so the default
//! [`BfsRouter`] already yields fewest-hop paths; a weighted search would
//! only add overhead.

use std::collections::VecDeque;

use fleet_core::VertexId;

use crate::NavGraph;

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable path planner.
///
/// Implementations return a vertex sequence that starts at `start` and ends
/// at `goal`, both inclusive.  No path is an empty `Vec`, not an error: the
/// caller treats it as "assignment rejected".
pub trait Router: Send + Sync {
    fn route(&self, graph: &NavGraph, start: VertexId, goal: VertexId) -> Vec<VertexId>;
}

// ── BfsRouter ─────────────────────────────────────────────────────────────────

/// Breadth-first search over the CSR adjacency.
///
/// Ties between equal-length paths are broken by neighbour order, i.e. lane
/// input order, so the result is reproducible for a given graph source.
#[derive(Copy, Clone, Debug, Default)]
pub struct BfsRouter;

impl Router for BfsRouter {
    fn route(&self, graph: &NavGraph, start: VertexId, goal: VertexId) -> Vec<VertexId> {
        bfs(graph, start, goal)
    }
}

// ── BFS internals ─────────────────────────────────────────────────────────────

/// Fewest-hop path from `start` to `goal`, endpoints inclusive.
pub fn bfs(graph: &NavGraph, start: VertexId, goal: VertexId) -> Vec<VertexId> {
    if !graph.contains(start) || !graph.contains(goal) {
        return vec![];
    }
    if start == goal {
        return vec![start];
    }

    let n = graph.vertex_count();
    // prev[v] = vertex we reached v from; `None` for undiscovered vertices.
    let mut prev: Vec<Option<VertexId>> = vec![None; n];
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();

    visited[start.index()] = true;
    queue.push_back(start);

    while let Some(vertex) = queue.pop_front() {
        for &next in graph.neighbors(vertex) {
            if visited[next.index()] {
                continue;
            }
            visited[next.index()] = true;
            prev[next.index()] = Some(vertex);
            if next == goal {
                return reconstruct(&prev, goal);
            }
            queue.push_back(next);
        }
    }

    vec![]
}

fn reconstruct(prev: &[Option<VertexId>], goal: VertexId) -> Vec<VertexId> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(p) = prev[cur.index()] {
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}
