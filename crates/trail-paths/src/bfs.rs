use crate::node::NodeId;
use crate::pathfinder::{Pathfinder, SearchStatus};
use crate::traits::Topology;

impl Pathfinder {
    /// Set start and destination, then [`search`](Self::search).
    pub fn find_path<T: Topology + ?Sized>(
        &mut self,
        topology: &T,
        start: NodeId,
        destination: NodeId,
    ) -> Vec<NodeId> {
        self.start = Some(start);
        self.destination = Some(destination);
        self.search(topology)
    }

    /// Breadth-first search from the stored start to the stored destination.
    ///
    /// Returns the fewest-steps path over active edges, both endpoints
    /// included, or an empty vector when:
    ///
    /// - start or destination is unset or not a node of `topology`, or they
    ///   are the same node (nothing is searched and the status is left as
    ///   it was);
    /// - the destination is unreachable ([`SearchStatus::Exhausted`]);
    /// - the iteration cap was hit ([`SearchStatus::Aborted`]).
    pub fn search<T: Topology + ?Sized>(&mut self, topology: &T) -> Vec<NodeId> {
        let (Some(start), Some(destination)) = (self.start, self.destination) else {
            return Vec::new();
        };
        let len = topology.node_count();
        if start == destination || start.index() >= len || destination.index() >= len {
            return Vec::new();
        }

        self.reset(len);
        self.status = SearchStatus::Searching;
        self.frontier.push_back(start);
        self.queued[start.index()] = true;

        let mut nbuf = std::mem::take(&mut self.nbuf);

        while self.status == SearchStatus::Searching {
            if self.iterations >= self.config.max_iterations {
                log::warn!(
                    "search {start} -> {destination} aborted after {} iterations",
                    self.iterations
                );
                self.status = SearchStatus::Aborted;
                break;
            }
            self.iterations += 1;

            let Some(current) = self.frontier.pop_front() else {
                self.status = SearchStatus::Exhausted;
                break;
            };
            let ci = current.index();
            if self.explored[ci] {
                continue;
            }
            self.explored[ci] = true;
            self.explored_count += 1;

            nbuf.clear();
            topology.neighbors(current, &mut nbuf);

            for &next in nbuf.iter() {
                let ni = next.index();
                if ni >= len || self.explored[ni] || self.queued[ni] {
                    continue;
                }
                self.breadcrumbs.set_previous(next, Some(current));
                self.queued[ni] = true;
                self.frontier.push_back(next);
                log::trace!("{next} discovered from {current}");
            }

            if self.queued[destination.index()] {
                self.path = self.path_nodes();
                self.status = SearchStatus::Found;
            }
        }

        self.nbuf = nbuf;

        log::debug!(
            "search {start} -> {destination}: {:?}, {} explored, {} steps",
            self.status,
            self.explored_count,
            self.path.len().saturating_sub(1)
        );

        if self.status == SearchStatus::Found {
            self.path.clone()
        } else {
            Vec::new()
        }
    }
}
