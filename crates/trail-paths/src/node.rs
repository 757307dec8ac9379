use std::fmt;

use trail_core::Vec3;

/// Horizontal offsets probed for automatic adjacency, in scan order
/// (east, west, north, south). Edge order on every node follows this order.
pub const NEIGHBOR_DIRECTIONS: [Vec3; 4] = [
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(0.0, 0.0, -1.0),
];

/// Stable handle of a node: its index in the owning [`Graph`](crate::Graph).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Index into the node arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A directed, toggleable link to a neighboring node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub neighbor: NodeId,
    pub active: bool,
}

/// A graph vertex: a position plus its outgoing edges.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    id: NodeId,
    position: Vec3,
    label: Option<String>,
    edges: Vec<Edge>,
    excluded: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, position: Vec3) -> Self {
        Self {
            id,
            position,
            label: None,
            edges: Vec::with_capacity(NEIGHBOR_DIRECTIONS.len()),
            excluded: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = Some(label);
    }

    /// Outgoing edges in discovery order.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Nodes this node refuses to auto-connect to.
    pub fn excluded(&self) -> &[NodeId] {
        &self.excluded
    }

    pub(crate) fn exclude(&mut self, other: NodeId) {
        if !self.excluded.contains(&other) {
            self.excluded.push(other);
        }
    }

    pub fn is_excluded(&self, other: NodeId) -> bool {
        self.excluded.contains(&other)
    }

    /// The edge pointing at `neighbor`, if any.
    pub fn edge_to(&self, neighbor: NodeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.neighbor == neighbor)
    }

    pub fn has_neighbor(&self, neighbor: NodeId) -> bool {
        self.edge_to(neighbor).is_some()
    }

    /// Targets of the currently traversable edges, in edge order.
    pub fn active_neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.edges.iter().filter(|e| e.active).map(|e| e.neighbor)
    }

    /// Probe the four horizontal unit offsets and add an active edge to each
    /// node found there.
    ///
    /// `lookup` resolves a world position to the node standing on it. Self
    /// matches, already-linked neighbors and excluded nodes are skipped, so
    /// calling this again only adds links that were not discoverable before.
    /// Returns the number of edges added.
    pub fn find_neighbors(&mut self, lookup: impl Fn(Vec3) -> Option<NodeId>) -> usize {
        let mut added = 0;
        for dir in NEIGHBOR_DIRECTIONS {
            let Some(found) = lookup(self.position + dir) else {
                continue;
            };
            if found == self.id || self.has_neighbor(found) || self.is_excluded(found) {
                continue;
            }
            self.edges.push(Edge {
                neighbor: found,
                active: true,
            });
            added += 1;
        }
        added
    }

    /// Set the active flag of the edge pointing at `neighbor`.
    ///
    /// Returns `false` (and changes nothing) if there is no such edge.
    pub fn enable_edge(&mut self, neighbor: NodeId, active: bool) -> bool {
        match self.edges.iter_mut().find(|e| e.neighbor == neighbor) {
            Some(edge) => {
                edge.active = active;
                true
            }
            None => false,
        }
    }
}
