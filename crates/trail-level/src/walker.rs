//! An agent that walks a path one edge at a time.
//!
//! The walker interpolates linearly between waypoints. Its current node
//! switches to the next waypoint once it is past the `enter_threshold`
//! fraction of the edge, which is when [`WalkEvent::Entered`] fires.

use trail_core::{Projector, Vec3};
use trail_paths::{Graph, NodeId};

/// Movement settings.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkerConfig {
    /// Seconds to cross one edge. Clamped to `0.1..=5.0`.
    pub move_time: f32,
    /// Fraction of an edge after which the target counts as entered.
    pub enter_threshold: f32,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            move_time: 0.5,
            enter_threshold: 0.51,
        }
    }
}

/// Something that happened during [`Walker::tick`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WalkEvent {
    /// The walker's current node became this node.
    Entered(NodeId),
    /// The walker stopped on the final waypoint.
    Arrived(NodeId),
}

#[derive(Clone, Debug)]
pub struct Walker {
    config: WalkerConfig,
    position: Vec3,
    current: Option<NodeId>,
    route: Vec<NodeId>,
    // Index into `route` of the waypoint being walked to.
    leg: usize,
    leg_start: Vec3,
    elapsed: f32,
    entered: bool,
    moving: bool,
}

impl Walker {
    pub fn new(position: Vec3) -> Self {
        Self::with_config(position, WalkerConfig::default())
    }

    pub fn with_config(position: Vec3, config: WalkerConfig) -> Self {
        let config = WalkerConfig {
            move_time: config.move_time.clamp(0.1, 5.0),
            ..config
        };
        Self {
            config,
            position,
            current: None,
            route: Vec::new(),
            leg: 0,
            leg_start: position,
            elapsed: 0.0,
            entered: false,
            moving: false,
        }
    }

    pub fn config(&self) -> &WalkerConfig {
        &self.config
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The node the walker is standing on (or most recently entered).
    #[inline]
    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    /// The waypoint being walked to.
    pub fn next_node(&self) -> Option<NodeId> {
        if self.moving {
            self.route.get(self.leg).copied()
        } else {
            None
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Waypoints still ahead, the one being walked to first.
    pub fn remaining(&self) -> &[NodeId] {
        if self.moving {
            &self.route[self.leg.min(self.route.len())..]
        } else {
            &[]
        }
    }

    /// Move onto the node that appears closest on screen.
    pub fn snap_to_nearest_node<P>(&mut self, graph: &Graph, projector: &P) -> Option<NodeId>
    where
        P: Projector + ?Sized,
    {
        let nearest = graph.find_closest_node(self.position, projector)?;
        self.place(graph, nearest);
        Some(nearest)
    }

    /// Stand on `node`, dropping any route.
    pub fn place(&mut self, graph: &Graph, node: NodeId) {
        if let Some(p) = graph.position(node) {
            self.position = p;
            self.current = Some(node);
            self.halt();
        }
    }

    /// Start walking `path`. The first element is where the walk begins.
    ///
    /// Rejected (returns `false`) while already moving or when the path has
    /// no step to take.
    pub fn follow(&mut self, path: Vec<NodeId>) -> bool {
        if self.moving || path.len() <= 1 {
            return false;
        }
        self.route = path;
        self.leg = 1;
        self.leg_start = self.position;
        self.elapsed = 0.0;
        self.entered = false;
        self.moving = true;
        true
    }

    /// Advance by `dt` seconds. Time left over after finishing one edge
    /// carries into the next.
    pub fn tick(&mut self, dt: f32, graph: &Graph) -> Vec<WalkEvent> {
        let mut events = Vec::new();
        let move_time = self.config.move_time;
        let mut remaining = dt.max(0.0);

        while self.moving && remaining > 0.0 {
            let Some(target) = self.route.get(self.leg).copied() else {
                self.halt();
                break;
            };
            let Some(target_pos) = graph.position(target) else {
                log::warn!("waypoint {target} is not in the graph; stopping");
                self.halt();
                break;
            };

            let left = move_time - self.elapsed;
            let leg_done = remaining >= left;
            let step = remaining.min(left);
            self.elapsed += step;
            remaining -= step;

            let t = if leg_done { 1.0 } else { self.elapsed / move_time };
            self.position = self.leg_start.lerp(target_pos, t);

            if !self.entered && t > self.config.enter_threshold.min(0.999) {
                self.current = Some(target);
                self.entered = true;
                events.push(WalkEvent::Entered(target));
            }

            if leg_done {
                self.position = target_pos;
                self.leg_start = target_pos;
                self.elapsed = 0.0;
                self.entered = false;
                self.leg += 1;
                if self.leg >= self.route.len() {
                    self.halt();
                    events.push(WalkEvent::Arrived(target));
                }
            }
        }
        events
    }

    /// Stop immediately and settle on the current node.
    pub fn stop(&mut self, graph: &Graph) {
        if !self.moving {
            return;
        }
        if let Some(p) = self.current.and_then(|n| graph.position(n)) {
            self.position = p;
        }
        self.halt();
    }

    /// Whether the walker stands on `node`.
    pub fn has_reached_node(&self, graph: &Graph, node: NodeId) -> bool {
        graph.has_reached(node, self.position)
    }

    /// Whether the walker stands on the graph's goal.
    pub fn has_reached_goal(&self, graph: &Graph) -> bool {
        graph
            .goal()
            .is_some_and(|goal| self.has_reached_node(graph, goal))
    }

    fn halt(&mut self) {
        self.moving = false;
        self.route.clear();
        self.leg = 0;
        self.elapsed = 0.0;
        self.entered = false;
        self.leg_start = self.position;
    }
}
