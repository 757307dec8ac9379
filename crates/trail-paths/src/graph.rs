use trail_core::{Projector, Vec3};

#[cfg(feature = "serde")]
use crate::builder::{BuildError, check_duplicates};
use crate::builder::{GraphConfig, locate};
use crate::node::{Edge, Node, NodeId};
use crate::traits::Topology;

/// All nodes of one level, with fixed topology and switchable edges.
///
/// Built by [`GraphBuilder::connect`](crate::GraphBuilder::connect). Nodes are
/// never added or removed afterwards; only edge activity changes.
///
/// With the `serde` feature a graph deserializes only if it could have come
/// out of `connect`: ids match arena slots, every handle is in range and no
/// node links twice to the same neighbor.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawGraph"))]
pub struct Graph {
    nodes: Vec<Node>,
    goal: Option<NodeId>,
    config: GraphConfig,
}

impl Graph {
    pub(crate) fn from_parts(nodes: Vec<Node>, goal: Option<NodeId>, config: GraphConfig) -> Self {
        Self {
            nodes,
            goal,
            config,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// World position of a node.
    pub fn position(&self, id: NodeId) -> Option<Vec3> {
        self.node(id).map(Node::position)
    }

    /// The level's goal node, if one was designated.
    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Total number of directed edges, active or not.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges().len()).sum()
    }

    /// First node carrying `label`.
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.label() == Some(label))
            .map(Node::id)
    }

    // -----------------------------------------------------------------------
    // Spatial queries
    // -----------------------------------------------------------------------

    /// The first node standing within the snap tolerance of `position`.
    pub fn find_node_at(&self, position: Vec3) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|n| n.position().approx_eq(position, self.config.snap_epsilon_sq))
            .map(Node::id)
    }

    /// The candidate whose projection lies closest to the projection of
    /// `position`. The earliest candidate wins ties; handles outside the
    /// graph are ignored.
    pub fn find_closest_node_among<P>(
        &self,
        candidates: &[NodeId],
        position: Vec3,
        projector: &P,
    ) -> Option<NodeId>
    where
        P: Projector + ?Sized,
    {
        let nodes = candidates.iter().filter_map(|&id| self.node(id));
        closest(nodes, position, projector)
    }

    /// [`find_closest_node_among`](Self::find_closest_node_among) over every
    /// node in the graph.
    pub fn find_closest_node<P>(&self, position: Vec3, projector: &P) -> Option<NodeId>
    where
        P: Projector + ?Sized,
    {
        closest(self.nodes.iter(), position, projector)
    }

    /// Whether `position` is within the snap tolerance of node `id`.
    pub fn has_reached(&self, id: NodeId, position: Vec3) -> bool {
        self.position(id)
            .is_some_and(|p| p.approx_eq(position, self.config.snap_epsilon_sq))
    }

    // -----------------------------------------------------------------------
    // Edge activity
    // -----------------------------------------------------------------------

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.node(from)?.edge_to(to)
    }

    /// Whether the edge `from -> to` exists and is active.
    pub fn is_edge_active(&self, from: NodeId, to: NodeId) -> bool {
        self.edge(from, to).is_some_and(|e| e.active)
    }

    /// Set the active flag of the edge `from -> to`. Returns `false` if there
    /// is no such edge.
    pub fn enable_edge(&mut self, from: NodeId, to: NodeId, active: bool) -> bool {
        match self.nodes.get_mut(from.index()) {
            Some(node) => node.enable_edge(to, active),
            None => false,
        }
    }

    /// Set both `a -> b` and `b -> a`. Returns how many edges were changed.
    pub fn set_link(&mut self, a: NodeId, b: NodeId, active: bool) -> usize {
        let forward = self.enable_edge(a, b, active);
        let backward = self.enable_edge(b, a, active);
        if !forward && !backward {
            log::debug!("no link between {a} and {b} to toggle");
        }
        usize::from(forward) + usize::from(backward)
    }

    /// Re-run neighbor discovery on every node.
    ///
    /// Existing edges (and their active flags) are kept; only links that
    /// were not present are added. Returns the number of edges added.
    pub fn refresh_neighbors(&mut self) -> usize {
        let positions: Vec<Vec3> = self.nodes.iter().map(Node::position).collect();
        let eps = self.config.snap_epsilon_sq;
        self.nodes
            .iter_mut()
            .map(|n| n.find_neighbors(|p| locate(&positions, p, eps)))
            .sum()
    }
}

fn closest<'a, P>(
    nodes: impl Iterator<Item = &'a Node>,
    position: Vec3,
    projector: &P,
) -> Option<NodeId>
where
    P: Projector + ?Sized,
{
    let target = projector.project(position);
    let mut best: Option<(NodeId, f32)> = None;
    for node in nodes {
        let d = projector.project(node.position()).distance_sq(target);
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((node.id(), d));
        }
    }
    best.map(|(id, _)| id)
}

/// Unchecked wire form of a [`Graph`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGraph {
    nodes: Vec<Node>,
    goal: Option<NodeId>,
    #[serde(default)]
    config: GraphConfig,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGraph> for Graph {
    type Error = BuildError;

    fn try_from(raw: RawGraph) -> Result<Self, BuildError> {
        let RawGraph {
            nodes,
            goal,
            config,
        } = raw;
        let len = nodes.len();
        let known = |id: NodeId| id.index() < len;

        if let Some(goal) = goal.filter(|&g| !known(g)) {
            return Err(BuildError::UnknownNode(goal));
        }
        for (index, node) in nodes.iter().enumerate() {
            let id = node.id();
            if id.index() != index {
                return Err(BuildError::MisplacedNode { index, id });
            }
            if let Some(&other) = node.excluded().iter().find(|&&o| !known(o)) {
                return Err(BuildError::UnknownNode(other));
            }
            for (i, edge) in node.edges().iter().enumerate() {
                let to = edge.neighbor;
                if !known(to) {
                    return Err(BuildError::DanglingEdge { from: id, to });
                }
                if node.edges()[..i].iter().any(|e| e.neighbor == to) {
                    return Err(BuildError::DuplicateEdge { from: id, to });
                }
            }
        }

        let positions: Vec<Vec3> = nodes.iter().map(Node::position).collect();
        check_duplicates(&positions, &config)?;
        Ok(Self::from_parts(nodes, goal, config))
    }
}

impl Topology for Graph {
    #[inline]
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn neighbors(&self, node: NodeId, buf: &mut Vec<NodeId>) {
        if let Some(n) = self.node(node) {
            buf.extend(n.active_neighbors());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphBuilder;
    use trail_core::{Isometric, TopDown, Vec2};

    /// `w` x `h` grid on the XZ plane; node (x, z) has id `z * w + x`.
    fn grid(w: usize, h: usize) -> Graph {
        let mut b = GraphBuilder::new();
        for z in 0..h {
            for x in 0..w {
                b.add_node(Vec3::new(x as f32, 0.0, z as f32));
            }
        }
        b.connect().unwrap()
    }

    fn id(x: u32, z: u32, w: u32) -> NodeId {
        NodeId(z * w + x)
    }

    #[test]
    fn find_node_at_tolerance() {
        let g = grid(3, 3);
        assert_eq!(g.find_node_at(Vec3::new(1.0, 0.0, 2.0)), Some(id(1, 2, 3)));
        assert_eq!(g.find_node_at(Vec3::new(1.05, 0.0, 1.95)), Some(id(1, 2, 3)));
        assert_eq!(g.find_node_at(Vec3::new(1.5, 0.0, 2.0)), None);
        assert_eq!(g.find_node_at(Vec3::new(1.0, 1.0, 2.0)), None);
    }

    #[test]
    fn grid_edges() {
        let g = grid(3, 3);
        // 12 undirected links in a 3x3 grid.
        assert_eq!(g.edge_count(), 24);
        let center = g.node(id(1, 1, 3)).unwrap();
        assert_eq!(center.edges().len(), 4);
        let corner = g.node(id(0, 0, 3)).unwrap();
        assert_eq!(corner.edges().len(), 2);
    }

    #[test]
    fn closest_node_top_down() {
        let g = grid(3, 3);
        let p = Vec3::new(1.8, 0.0, 0.3);
        assert_eq!(g.find_closest_node(p, &TopDown), Some(id(2, 0, 3)));
    }

    #[test]
    fn closest_among_candidates() {
        let g = grid(3, 3);
        let candidates = [id(0, 0, 3), id(0, 2, 3)];
        let p = Vec3::new(2.0, 0.0, 2.0);
        assert_eq!(
            g.find_closest_node_among(&candidates, p, &TopDown),
            Some(id(0, 2, 3))
        );
        assert_eq!(g.find_closest_node_among(&[], p, &TopDown), None);
        assert_eq!(g.find_closest_node_among(&[NodeId(99)], p, &TopDown), None);
    }

    #[test]
    fn closest_node_ties_keep_first() {
        let g = grid(3, 1);
        let p = Vec3::new(1.0, 0.0, 0.0);
        let candidates = [id(0, 0, 3), id(2, 0, 3)];
        assert_eq!(
            g.find_closest_node_among(&candidates, p, &TopDown),
            Some(id(0, 0, 3))
        );
    }

    #[test]
    fn closest_node_uses_screen_space() {
        // A floor node half a unit away and a raised node that the camera
        // sees exactly behind the click.
        let mut b = GraphBuilder::new();
        let floor = b.add_node(Vec3::new(0.0, 0.0, 0.5));
        let raised = b.add_node(Vec3::new(0.0, 1.0, -1.0));
        let g = b.connect().unwrap();
        let click = Vec3::ZERO;
        let flat = |v: Vec3| Vec2::new(v.x, v.z);
        assert_eq!(g.find_closest_node(click, &flat), Some(floor));
        let cam = Isometric::new(0.0, std::f32::consts::FRAC_PI_4, 1.0);
        assert_eq!(g.find_closest_node(click, &cam), Some(raised));
    }

    #[test]
    fn link_toggling() {
        let mut g = grid(2, 1);
        let (a, b) = (id(0, 0, 2), id(1, 0, 2));
        assert!(g.is_edge_active(a, b));
        assert_eq!(g.set_link(a, b, false), 2);
        assert!(!g.is_edge_active(a, b));
        assert!(!g.is_edge_active(b, a));
        assert!(g.enable_edge(b, a, true));
        assert!(g.is_edge_active(b, a));
        assert!(!g.is_edge_active(a, b));
    }

    #[test]
    fn toggling_missing_edges_is_harmless() {
        let mut g = grid(3, 1);
        assert!(!g.enable_edge(id(0, 0, 3), id(2, 0, 3), false));
        assert!(!g.enable_edge(NodeId(50), id(0, 0, 3), false));
        assert_eq!(g.set_link(id(0, 0, 3), id(2, 0, 3), false), 0);
        assert!(g.edge(id(0, 0, 3), id(2, 0, 3)).is_none());
    }

    #[test]
    fn refresh_is_idempotent_and_keeps_flags() {
        let mut g = grid(3, 3);
        g.set_link(id(0, 0, 3), id(1, 0, 3), false);
        let before: Vec<Vec<Edge>> = g.nodes().iter().map(|n| n.edges().to_vec()).collect();
        assert_eq!(g.refresh_neighbors(), 0);
        let after: Vec<Vec<Edge>> = g.nodes().iter().map(|n| n.edges().to_vec()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn topology_yields_active_neighbors() {
        let mut g = grid(3, 1);
        let mut buf = Vec::new();
        g.neighbors(id(1, 0, 3), &mut buf);
        assert_eq!(buf, vec![id(2, 0, 3), id(0, 0, 3)]);
        g.enable_edge(id(1, 0, 3), id(2, 0, 3), false);
        buf.clear();
        g.neighbors(id(1, 0, 3), &mut buf);
        assert_eq!(buf, vec![id(0, 0, 3)]);
        assert_eq!(g.node_count(), 3);
    }

    #[test]
    fn has_reached_and_labels() {
        let mut b = GraphBuilder::new();
        let a = b.add_node(Vec3::ZERO);
        b.label(a, "plate");
        let g = b.connect().unwrap();
        assert!(g.has_reached(a, Vec3::new(0.05, 0.0, 0.0)));
        assert!(!g.has_reached(a, Vec3::new(0.5, 0.0, 0.0)));
        assert!(!g.has_reached(NodeId(4), Vec3::ZERO));
        assert_eq!(g.find_by_label("plate"), Some(a));
        assert_eq!(g.find_by_label("door"), None);
    }
}
