//! Directed edges, the unit of reservation.

use std::fmt;

use fleet_core::VertexId;

/// An ordered vertex pair: "about to traverse from `from` to `to`".
///
/// Lanes are undirected, but reservations are not: `(a, b)` and `(b, a)`
/// are distinct keys.  Admission checks both, see [`reversed`](Self::reversed).
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct DirectedEdge {
    pub from: VertexId,
    pub to:   VertexId,
}

impl DirectedEdge {
    #[inline]
    pub fn new(from: VertexId, to: VertexId) -> Self {
        Self { from, to }
    }

    /// The same lane traversed the other way.
    #[inline]
    pub fn reversed(self) -> Self {
        Self { from: self.to, to: self.from }
    }
}

impl From<(VertexId, VertexId)> for DirectedEdge {
    fn from((from, to): (VertexId, VertexId)) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}
