//! Two-phase graph construction.
//!
//! Phase one collects every node ([`GraphBuilder::add_node`]). Phase two
//! ([`GraphBuilder::connect`]) resolves adjacency against the complete node
//! set. `connect` consumes the builder, so no node can probe for neighbors
//! before all of them exist.

use std::fmt;

use trail_core::Vec3;

use crate::graph::Graph;
use crate::node::{Node, NodeId};

/// What to do when two nodes occupy the same position.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DuplicatePolicy {
    /// Keep both; position lookups resolve to the first one. Logged as a
    /// warning.
    #[default]
    Allow,
    /// Fail [`GraphBuilder::connect`] with [`BuildError::DuplicatePosition`].
    Reject,
}

/// Spatial tolerances and validation settings for a graph.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GraphConfig {
    /// Squared distance under which a position is considered to be "at" a
    /// node.
    pub snap_epsilon_sq: f32,
    pub duplicates: DuplicatePolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            snap_epsilon_sq: 0.01,
            duplicates: DuplicatePolicy::Allow,
        }
    }
}

/// Collects nodes before they are linked into a [`Graph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    config: GraphConfig,
    nodes: Vec<Node>,
    goal: Option<NodeId>,
    // Checked in `connect`: ids may come from another builder.
    pending_excludes: Vec<(NodeId, NodeId)>,
    pending_labels: Vec<(NodeId, String)>,
}

impl GraphBuilder {
    /// Create a builder with the default [`GraphConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Add a node at `position` and return its handle.
    pub fn add_node(&mut self, position: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, position));
        id
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Prevent `from` from automatically linking to `to`. The reverse link is
    /// unaffected.
    pub fn exclude(&mut self, from: NodeId, to: NodeId) -> &mut Self {
        self.pending_excludes.push((from, to));
        self
    }

    /// Prevent `a` and `b` from automatically linking in either direction.
    pub fn exclude_pair(&mut self, a: NodeId, b: NodeId) -> &mut Self {
        self.exclude(a, b).exclude(b, a)
    }

    /// Designate the level's goal node.
    pub fn set_goal(&mut self, goal: NodeId) -> &mut Self {
        self.goal = Some(goal);
        self
    }

    /// Attach a human-readable name to a node.
    pub fn label(&mut self, id: NodeId, label: impl Into<String>) -> &mut Self {
        self.pending_labels.push((id, label.into()));
        self
    }

    /// Resolve every node's neighbors and return the finished graph.
    pub fn connect(self) -> Result<Graph, BuildError> {
        let Self {
            config,
            mut nodes,
            goal,
            pending_excludes,
            pending_labels,
        } = self;
        let len = nodes.len();
        let known = |id: NodeId| {
            if id.index() < len {
                Ok(id)
            } else {
                Err(BuildError::UnknownNode(id))
            }
        };

        if let Some(goal) = goal {
            known(goal)?;
        }
        for (from, to) in pending_excludes {
            nodes[known(from)?.index()].exclude(known(to)?);
        }
        for (id, label) in pending_labels {
            nodes[known(id)?.index()].set_label(label);
        }

        let positions: Vec<Vec3> = nodes.iter().map(|n| n.position()).collect();
        let eps = config.snap_epsilon_sq;
        check_duplicates(&positions, &config)?;

        let mut edges = 0;
        for node in nodes.iter_mut() {
            edges += node.find_neighbors(|q| locate(&positions, q, eps));
        }
        log::debug!("graph connected: {len} nodes, {edges} edges");

        Ok(Graph::from_parts(nodes, goal, config))
    }
}

/// First index whose position lies within `eps_sq` of `p`.
pub(crate) fn locate(positions: &[Vec3], p: Vec3, eps_sq: f32) -> Option<NodeId> {
    positions
        .iter()
        .position(|q| q.approx_eq(p, eps_sq))
        .map(|i| NodeId(i as u32))
}

/// Warn about (or reject, per `config.duplicates`) nodes sharing a position.
pub(crate) fn check_duplicates(positions: &[Vec3], config: &GraphConfig) -> Result<(), BuildError> {
    let eps = config.snap_epsilon_sq;
    for (i, &p) in positions.iter().enumerate() {
        let Some(first) = locate(positions, p, eps) else {
            continue;
        };
        if first.index() == i {
            continue;
        }
        let second = NodeId(i as u32);
        match config.duplicates {
            DuplicatePolicy::Allow => {
                log::warn!(
                    "node {second} at {p} shadows node {first}; lookups resolve to {first}"
                );
            }
            DuplicatePolicy::Reject => {
                return Err(BuildError::DuplicatePosition {
                    first,
                    second,
                    position: p,
                });
            }
        }
    }
    Ok(())
}

/// Errors that can occur when connecting a graph.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A handle that the builder never issued.
    UnknownNode(NodeId),
    /// Two nodes share a position under [`DuplicatePolicy::Reject`].
    DuplicatePosition {
        first: NodeId,
        second: NodeId,
        position: Vec3,
    },
    /// A stored node whose id does not match its place in the arena.
    MisplacedNode { index: usize, id: NodeId },
    /// A stored edge pointing outside the graph.
    DanglingEdge { from: NodeId, to: NodeId },
    /// A stored node with two edges to the same neighbor.
    DuplicateEdge { from: NodeId, to: NodeId },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "graph: unknown node {id}"),
            Self::DuplicatePosition {
                first,
                second,
                position,
            } => write!(
                f,
                "graph: nodes {first} and {second} share position {position}"
            ),
            Self::MisplacedNode { index, id } => {
                write!(f, "graph: node at index {index} has id {id}")
            }
            Self::DanglingEdge { from, to } => {
                write!(f, "graph: edge {from} -> {to} points outside the graph")
            }
            Self::DuplicateEdge { from, to } => {
                write!(f, "graph: node {from} has more than one edge to {to}")
            }
        }
    }
}

impl std::error::Error for BuildError {}
