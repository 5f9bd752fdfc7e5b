//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Lanes are undirected, so each lane is stored as two half-edges in
//! **Compressed Sparse Row (CSR)** form.  The neighbours of `VertexId v`
//! occupy the contiguous slice:
//!
//! ```text
//! adj[ adj_start[v] .. adj_start[v+1] ]
//! ```
//!
//! Half-edges keep lane input order within each vertex's row (the sort is
//! stable), which makes BFS tie-breaking a pure function of the input.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps map-frame `(x, y)` to the nearest vertex.
//! The presentation layer uses it to turn a click into a vertex id.

use std::collections::HashSet;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde_json::{Map, Value};

use fleet_core::{Point, VertexId};

use crate::{GraphError, GraphLoadError, GraphResult};

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct VertexEntry {
    point: [f64; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── VertexAttributes ──────────────────────────────────────────────────────────

/// Free-form vertex attributes as they appear in the graph source.
///
/// Well-known keys get typed accessors; everything else is reachable through
/// [`get`](Self::get).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexAttributes(Map<String, Value>);

impl VertexAttributes {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// The `"name"` attribute, if present and a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// `true` if the vertex is flagged `"is_charger": true`.
    pub fn is_charger(&self) -> bool {
        self.0
            .get("is_charger")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Undirected navigation graph in CSR form plus a spatial index.
///
/// Immutable once built.  Do not construct directly; use
/// [`NavGraphBuilder`] or the loaders in [`crate::loader`].
#[derive(Debug)]
pub struct NavGraph {
    /// Map-frame position of each vertex.  Indexed by `VertexId`.
    vertex_pos: Vec<Point>,

    /// Attributes of each vertex.  Indexed by `VertexId`.
    vertex_attrs: Vec<VertexAttributes>,

    /// Deduplicated lanes in input order, endpoints as given.
    lanes: Vec<(VertexId, VertexId)>,

    /// CSR row pointer.  Length = `vertex_count + 1`.
    adj_start: Vec<u32>,

    /// Half-edge targets, grouped by source vertex.
    adj: Vec<VertexId>,

    spatial_idx: RTree<VertexEntry>,
}

impl NavGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    /// Number of distinct undirected lanes.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    #[inline]
    pub fn contains(&self, vertex: VertexId) -> bool {
        vertex.index() < self.vertex_pos.len()
    }

    /// All vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertex_pos.len()).map(|i| VertexId(i as u32))
    }

    pub fn lanes(&self) -> &[(VertexId, VertexId)] {
        &self.lanes
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbours of `vertex`, in lane input order.
    ///
    /// Unknown vertices have no neighbours; this never fails.
    #[inline]
    pub fn neighbors(&self, vertex: VertexId) -> &[VertexId] {
        if !self.contains(vertex) {
            return &[];
        }
        let start = self.adj_start[vertex.index()] as usize;
        let end   = self.adj_start[vertex.index() + 1] as usize;
        &self.adj[start..end]
    }

    /// `true` if a lane joins `a` and `b` (in either direction).
    pub fn has_lane(&self, a: VertexId, b: VertexId) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Fewest-hop path from `start` to `goal`, both endpoints included.
    ///
    /// `[start]` when `start == goal`; empty when no path exists or either
    /// endpoint is unknown.  See [`crate::router::bfs`].
    pub fn shortest_path(&self, start: VertexId, goal: VertexId) -> Vec<VertexId> {
        crate::router::bfs(self, start, goal)
    }

    // ── Vertex accessors ──────────────────────────────────────────────────

    pub fn position(&self, vertex: VertexId) -> GraphResult<Point> {
        self.vertex_pos
            .get(vertex.index())
            .copied()
            .ok_or(GraphError::UnknownVertex(vertex))
    }

    pub fn attributes(&self, vertex: VertexId) -> GraphResult<&VertexAttributes> {
        self.vertex_attrs
            .get(vertex.index())
            .ok_or(GraphError::UnknownVertex(vertex))
    }

    /// First vertex whose `"name"` attribute equals `name`.
    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.vertex_attrs
            .iter()
            .position(|a| a.name() == Some(name))
            .map(|i| VertexId(i as u32))
    }

    /// All vertices flagged as chargers, ascending.
    pub fn chargers(&self) -> Vec<VertexId> {
        self.vertex_attrs
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_charger())
            .map(|(i, _)| VertexId(i as u32))
            .collect()
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The vertex nearest to `pos`.  `None` only for an empty graph, which
    /// the builder never produces.
    pub fn nearest_vertex(&self, pos: Point) -> Option<VertexId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_array())
            .map(|e| e.id)
    }

    /// Up to `k` vertices nearest to `pos`, by ascending distance.
    pub fn k_nearest_vertices(&self, pos: Point, k: usize) -> Vec<VertexId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// Vertices get sequential ids from 0 in insertion order.  Lanes may be added
/// in any order and are validated by `build()`.
///
/// # Example
///
/// ```
/// use fleet_core::Point;
/// use fleet_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_vertex(Point::new(0.0, 0.0), Default::default());
/// let c = b.add_vertex(Point::new(10.0, 0.0), Default::default());
/// b.add_lane(a, c);
/// b.add_lane(c, a); // duplicate, ignored
/// let graph = b.build().unwrap();
/// assert_eq!(graph.lane_count(), 1);
/// assert_eq!(graph.neighbors(a), &[c]);
/// ```
#[derive(Default)]
pub struct NavGraphBuilder {
    positions: Vec<Point>,
    attrs:     Vec<VertexAttributes>,
    raw_lanes: Vec<(u32, u32)>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, lanes: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            attrs:     Vec::with_capacity(vertices),
            raw_lanes: Vec::with_capacity(lanes),
        }
    }

    /// Add a vertex and return its id (sequential from 0).
    pub fn add_vertex(&mut self, pos: Point, attrs: VertexAttributes) -> VertexId {
        let id = VertexId(self.positions.len() as u32);
        self.positions.push(pos);
        self.attrs.push(attrs);
        id
    }

    /// Add an undirected lane between `a` and `b`.
    pub fn add_lane(&mut self, a: VertexId, b: VertexId) {
        self.raw_lanes.push((a.0, b.0));
    }

    /// Add a lane from raw source indices; endpoints are checked at build time.
    pub(crate) fn add_raw_lane(&mut self, a: u32, b: u32) {
        self.raw_lanes.push((a, b));
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Validate and produce a [`NavGraph`].
    ///
    /// Fails on an empty vertex set, a lane endpoint outside the vertex set,
    /// or a self-loop.  Duplicate lanes (either orientation) collapse into
    /// the first occurrence.
    pub fn build(self) -> Result<NavGraph, GraphLoadError> {
        let vertex_count = self.positions.len();
        if vertex_count == 0 {
            return Err(GraphLoadError::Empty);
        }

        let mut seen  = HashSet::with_capacity(self.raw_lanes.len());
        let mut lanes = Vec::with_capacity(self.raw_lanes.len());
        for (lane, &(a, b)) in self.raw_lanes.iter().enumerate() {
            for vertex in [a, b] {
                if vertex as usize >= vertex_count {
                    return Err(GraphLoadError::UnknownLaneEndpoint { lane, vertex });
                }
            }
            if a == b {
                return Err(GraphLoadError::SelfLoop { lane, vertex: VertexId(a) });
            }
            if seen.insert((a.min(b), a.max(b))) {
                lanes.push((VertexId(a), VertexId(b)));
            }
        }

        // Two half-edges per lane; stable sort keeps lane order per source.
        let mut half: Vec<(VertexId, VertexId)> = lanes
            .iter()
            .flat_map(|&(a, b)| [(a, b), (b, a)])
            .collect();
        half.sort_by_key(|&(from, _)| from.0);

        let mut adj_start = vec![0u32; vertex_count + 1];
        for &(from, _) in &half {
            adj_start[from.index() + 1] += 1;
        }
        for i in 1..=vertex_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[vertex_count] as usize, half.len());
        let adj = half.into_iter().map(|(_, to)| to).collect();

        let entries: Vec<VertexEntry> = self
            .positions
            .iter()
            .enumerate()
            .map(|(i, &pos)| VertexEntry { point: pos.to_array(), id: VertexId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        Ok(NavGraph {
            vertex_pos: self.positions,
            vertex_attrs: self.attrs,
            lanes,
            adj_start,
            adj,
            spatial_idx,
        })
    }
}
