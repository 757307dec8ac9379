//! Multi-candidate queries and start binding.

use trail_core::{Projector, Vec3};

use crate::graph::Graph;
use crate::node::NodeId;
use crate::pathfinder::Pathfinder;
use crate::traits::Topology;

impl Pathfinder {
    /// Search from `start` to each candidate and keep the shortest path.
    ///
    /// Candidates that cannot be reached are skipped. Among equally short
    /// paths the earliest candidate wins. If no candidate yields a path of
    /// at least one step, start, destination and stored path are cleared and
    /// the result is empty; otherwise the destination becomes the chosen
    /// candidate and the path is stored.
    ///
    /// The search state is that of the last candidate tried, not of the
    /// chosen one: [`status`](Self::status) and
    /// [`is_path_complete`](Self::is_path_complete) may report a failed
    /// search even though a path was returned, and
    /// [`path_nodes`](Self::path_nodes) reads that search's breadcrumbs. Use
    /// the return value or [`path`](Self::path) instead.
    pub fn find_best_path<T: Topology + ?Sized>(
        &mut self,
        topology: &T,
        start: NodeId,
        candidates: &[NodeId],
    ) -> Vec<NodeId> {
        let mut best: Vec<NodeId> = Vec::new();
        for &candidate in candidates {
            let path = self.find_path(topology, start, candidate);
            if path.is_empty() {
                continue;
            }
            if best.is_empty() || path.len() < best.len() {
                best = path;
            }
        }

        if best.len() <= 1 {
            log::debug!("no usable path from {start} to any of {} candidates", candidates.len());
            self.clear_path();
            return Vec::new();
        }

        self.start = Some(start);
        self.destination = best.last().copied();
        self.path.clone_from(&best);
        best
    }

    /// Bind the start to the graph node closest to `position` on screen.
    pub fn set_start_node<P>(&mut self, graph: &Graph, position: Vec3, projector: &P)
    where
        P: Projector + ?Sized,
    {
        self.start = graph.find_closest_node(position, projector);
    }
}

#[cfg(test)]
mod tests {
    use trail_core::TopDown;

    use super::*;
    use crate::{GraphBuilder, SearchStatus};

    fn grid(w: usize, h: usize) -> Graph {
        let mut b = GraphBuilder::new();
        for z in 0..h {
            for x in 0..w {
                b.add_node(Vec3::new(x as f32, 0.0, z as f32));
            }
        }
        b.connect().unwrap()
    }

    fn at(x: u32, z: u32) -> NodeId {
        NodeId(z * 4 + x)
    }

    #[test]
    fn picks_the_closest_candidate() {
        let g = grid(4, 4);
        let mut pf = Pathfinder::new();
        let path = pf.find_best_path(&g, at(0, 0), &[at(3, 3), at(2, 0), at(0, 3)]);
        assert_eq!(path, vec![at(0, 0), at(1, 0), at(2, 0)]);
        assert_eq!(pf.destination(), Some(at(2, 0)));
        assert_eq!(pf.start(), Some(at(0, 0)));
        assert_eq!(pf.path(), path.as_slice());
    }

    #[test]
    fn ties_go_to_the_first_listed() {
        let g = grid(4, 4);
        let mut pf = Pathfinder::new();
        let path = pf.find_best_path(&g, at(1, 1), &[at(1, 3), at(3, 1)]);
        assert_eq!(path.last(), Some(&at(1, 3)));
        let path = pf.find_best_path(&g, at(1, 1), &[at(3, 1), at(1, 3)]);
        assert_eq!(path.last(), Some(&at(3, 1)));
    }

    #[test]
    fn unreachable_candidates_are_skipped() {
        let mut g = grid(4, 1);
        g.set_link(at(1, 0), at(2, 0), false);
        let mut pf = Pathfinder::new();
        let path = pf.find_best_path(&g, at(0, 0), &[at(3, 0), at(1, 0)]);
        assert_eq!(path, vec![at(0, 0), at(1, 0)]);
        assert_eq!(pf.destination(), Some(at(1, 0)));

        assert!(pf.find_best_path(&g, at(0, 0), &[at(2, 0), at(3, 0)]).is_empty());
        assert_eq!(pf.start(), None);
        assert_eq!(pf.destination(), None);
        assert!(pf.path().is_empty());
    }

    #[test]
    fn standing_on_a_candidate_is_not_a_path() {
        let g = grid(4, 1);
        let mut pf = Pathfinder::new();
        assert!(pf.find_best_path(&g, at(2, 0), &[at(2, 0)]).is_empty());
        assert_eq!(pf.destination(), None);
        // A self candidate next to a real one does not discard the real one.
        let path = pf.find_best_path(&g, at(2, 0), &[at(0, 0), at(2, 0)]);
        assert_eq!(path.last(), Some(&at(0, 0)));
    }

    #[test]
    fn status_follows_the_last_candidate() {
        let mut g = grid(4, 1);
        g.set_link(at(1, 0), at(2, 0), false);
        let mut pf = Pathfinder::new();
        let path = pf.find_best_path(&g, at(0, 0), &[at(1, 0), at(3, 0)]);
        assert_eq!(path, vec![at(0, 0), at(1, 0)]);
        assert_eq!(pf.status(), SearchStatus::Exhausted);
        assert!(!pf.is_path_complete());
        assert_eq!(pf.path(), path.as_slice());
    }

    #[test]
    fn empty_candidate_list() {
        let g = grid(2, 2);
        let mut pf = Pathfinder::new();
        assert!(pf.find_best_path(&g, NodeId(0), &[]).is_empty());
        assert_eq!(pf.status(), SearchStatus::Idle);
    }

    #[test]
    fn best_path_is_minimal_over_candidates() {
        let mut g = grid(4, 4);
        g.set_link(at(1, 1), at(2, 1), false);
        g.set_link(at(1, 2), at(2, 2), false);
        let candidates = [at(3, 1), at(3, 2), at(0, 3)];
        let mut pf = Pathfinder::new();
        let best = pf.find_best_path(&g, at(1, 1), &candidates);
        for &c in &candidates {
            let single = pf.find_path(&g, at(1, 1), c);
            assert!(single.is_empty() || single.len() >= best.len());
        }
    }

    #[test]
    fn set_start_node_snaps_to_closest() {
        let g = grid(4, 4);
        let mut pf = Pathfinder::new();
        pf.set_start_node(&g, Vec3::new(2.9, 0.4, 1.2), &TopDown);
        assert_eq!(pf.start(), Some(at(3, 1)));
        pf.set_destination(Some(at(3, 3)));
        assert_eq!(pf.search(&g).len(), 3);
    }
}
