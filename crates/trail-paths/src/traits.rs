use crate::node::NodeId;

/// Minimal search interface: node count plus traversable-neighbor
/// enumeration.
///
/// Node handles are dense: every id below [`node_count`](Self::node_count)
/// is valid.
pub trait Topology {
    /// Number of nodes. Handles at or above this are treated as absent.
    fn node_count(&self) -> usize;

    /// Append the nodes reachable in one step from `node` into `buf`, in a
    /// stable order. The caller clears `buf` before calling.
    fn neighbors(&self, node: NodeId, buf: &mut Vec<NodeId>);
}
