use std::collections::VecDeque;

use crate::node::NodeId;

/// Limits for a single search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PathfinderConfig {
    /// Expansion steps after which a search gives up. Guards against
    /// malformed graphs; well-formed levels finish far below it.
    pub max_iterations: usize,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self { max_iterations: 100 }
    }
}

/// Where the last search ended up.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// No search has run yet.
    #[default]
    Idle,
    Searching,
    /// The destination was reached.
    Found,
    /// The frontier ran dry before reaching the destination.
    Exhausted,
    /// The iteration cap was hit.
    Aborted,
}

impl SearchStatus {
    /// Whether the search has finished, successfully or not.
    #[inline]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Found | Self::Exhausted | Self::Aborted)
    }

    #[inline]
    pub fn is_found(self) -> bool {
        self == Self::Found
    }
}

// ---------------------------------------------------------------------------
// Breadcrumbs
// ---------------------------------------------------------------------------

/// Search-scoped predecessor links: for every discovered node, the node it
/// was discovered from.
#[derive(Clone, Debug, Default)]
pub struct Breadcrumbs {
    previous: Vec<Option<NodeId>>,
}

impl Breadcrumbs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every trail and size the map for `len` nodes.
    pub fn reset(&mut self, len: usize) {
        self.previous.clear();
        self.previous.resize(len, None);
    }

    /// The node `id` was discovered from.
    #[inline]
    pub fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.previous.get(id.index()).copied().flatten()
    }

    /// Record `prev` as the predecessor of `id`. Out-of-range ids are
    /// ignored.
    #[inline]
    pub fn set_previous(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(slot) = self.previous.get_mut(id.index()) {
            *slot = prev;
        }
    }

    /// Follow the trail back from `end` to its root and return it root
    /// first. Always contains `end`.
    pub fn trail(&self, end: NodeId) -> Vec<NodeId> {
        let mut path = vec![end];
        let mut current = end;
        // A trail can't be longer than the node count; stop there in case
        // the links were set by hand into a loop.
        while let Some(prev) = self.previous(current) {
            if path.len() > self.previous.len() {
                break;
            }
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

/// Stateful breadth-first path search.
///
/// The pathfinder owns its frontier, explored set, breadcrumbs and result
/// buffer and reuses them across queries. One instance runs one search at a
/// time; searches take `&mut self`, so sharing an instance between threads
/// needs an outer lock.
///
/// [`path_nodes`](Self::path_nodes) reads the breadcrumbs left by the most
/// recent search. Running another search (including the per-candidate
/// searches of [`find_best_path`](Self::find_best_path)) replaces them.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    pub(crate) config: PathfinderConfig,
    pub(crate) start: Option<NodeId>,
    pub(crate) destination: Option<NodeId>,
    pub(crate) frontier: VecDeque<NodeId>,
    pub(crate) explored: Vec<bool>,
    // Set once a node enters the frontier, never cleared during a search.
    pub(crate) queued: Vec<bool>,
    pub(crate) explored_count: usize,
    pub(crate) iterations: usize,
    pub(crate) breadcrumbs: Breadcrumbs,
    pub(crate) path: Vec<NodeId>,
    pub(crate) status: SearchStatus,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<NodeId>,
}

impl Pathfinder {
    /// Create a pathfinder with the default [`PathfinderConfig`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PathfinderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PathfinderConfig) {
        self.config = config;
    }

    #[inline]
    pub fn start(&self) -> Option<NodeId> {
        self.start
    }

    pub fn set_start(&mut self, start: Option<NodeId>) {
        self.start = start;
    }

    #[inline]
    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn set_destination(&mut self, destination: Option<NodeId>) {
        self.destination = destination;
    }

    /// The stored path: the last successful search result, or the chosen
    /// path after [`find_best_path`](Self::find_best_path).
    #[inline]
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    #[inline]
    pub fn status(&self) -> SearchStatus {
        self.status
    }

    /// Whether the last search ran to an end (found, exhausted or aborted).
    #[inline]
    pub fn is_search_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Whether the last search reached its destination.
    #[inline]
    pub fn is_path_complete(&self) -> bool {
        self.status.is_found()
    }

    /// Nodes expanded by the last search.
    pub fn explored_count(&self) -> usize {
        self.explored_count
    }

    /// Loop iterations used by the last search.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn breadcrumbs(&self) -> &Breadcrumbs {
        &self.breadcrumbs
    }

    /// Forget start, destination and stored path.
    pub fn clear_path(&mut self) {
        self.start = None;
        self.destination = None;
        self.path.clear();
    }

    /// Rebuild the node sequence ending at the current destination from the
    /// breadcrumbs of the last search. Empty if no destination is set.
    pub fn path_nodes(&self) -> Vec<NodeId> {
        match self.destination {
            Some(destination) => self.breadcrumbs.trail(destination),
            None => Vec::new(),
        }
    }

    /// Clear every working set and size them for `len` nodes.
    pub(crate) fn reset(&mut self, len: usize) {
        self.frontier.clear();
        self.explored.clear();
        self.explored.resize(len, false);
        self.queued.clear();
        self.queued.resize(len, false);
        self.explored_count = 0;
        self.iterations = 0;
        self.path.clear();
        self.breadcrumbs.reset(len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breadcrumb_trail_runs_root_first() {
        let mut b = Breadcrumbs::new();
        b.reset(4);
        b.set_previous(NodeId(3), Some(NodeId(1)));
        b.set_previous(NodeId(1), Some(NodeId(0)));
        assert_eq!(b.trail(NodeId(3)), vec![NodeId(0), NodeId(1), NodeId(3)]);
        assert_eq!(b.trail(NodeId(2)), vec![NodeId(2)]);
        assert_eq!(b.previous(NodeId(9)), None);
    }

    #[test]
    fn breadcrumb_reset_clears_trails() {
        let mut b = Breadcrumbs::new();
        b.reset(2);
        b.set_previous(NodeId(1), Some(NodeId(0)));
        b.reset(2);
        assert_eq!(b.previous(NodeId(1)), None);
        // Out of range writes are dropped.
        b.set_previous(NodeId(5), Some(NodeId(0)));
        assert_eq!(b.previous(NodeId(5)), None);
    }

    #[test]
    fn breadcrumb_loop_terminates() {
        let mut b = Breadcrumbs::new();
        b.reset(2);
        b.set_previous(NodeId(0), Some(NodeId(1)));
        b.set_previous(NodeId(1), Some(NodeId(0)));
        assert!(b.trail(NodeId(0)).len() <= 3);
    }

    #[test]
    fn clear_path_forgets_endpoints() {
        let mut pf = Pathfinder::new();
        pf.set_start(Some(NodeId(0)));
        pf.set_destination(Some(NodeId(1)));
        pf.path.push(NodeId(0));
        pf.clear_path();
        assert_eq!(pf.start(), None);
        assert_eq!(pf.destination(), None);
        assert!(pf.path().is_empty());
        assert!(pf.path_nodes().is_empty());
    }

    #[test]
    fn status_flags() {
        assert!(!SearchStatus::Idle.is_complete());
        assert!(!SearchStatus::Searching.is_complete());
        assert!(SearchStatus::Exhausted.is_complete());
        assert!(SearchStatus::Aborted.is_complete());
        assert!(SearchStatus::Found.is_found());
        assert!(!SearchStatus::Aborted.is_found());
        assert_eq!(PathfinderConfig::default().max_iterations, 100);
    }
}
