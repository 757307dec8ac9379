use trail_paths::{Graph, NodeId};

/// A trigger node that switches the link between two other nodes.
///
/// Stepping on `at` sets both directions of the `a`-`b` link to `enables`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PressurePlate {
    pub at: NodeId,
    pub a: NodeId,
    pub b: NodeId,
    pub enables: bool,
    pressed: bool,
}

impl PressurePlate {
    pub fn new(at: NodeId, a: NodeId, b: NodeId, enables: bool) -> Self {
        Self {
            at,
            a,
            b,
            enables,
            pressed: false,
        }
    }

    /// Put the link into its "not yet pressed" state.
    pub fn arm(&self, graph: &mut Graph) {
        graph.set_link(self.a, self.b, !self.enables);
    }

    /// Apply the plate to `graph`. Returns the number of edges switched.
    pub fn press(&mut self, graph: &mut Graph) -> usize {
        let changed = graph.set_link(self.a, self.b, self.enables);
        if !self.pressed {
            log::debug!(
                "plate {} {} link {} - {}",
                self.at,
                if self.enables { "opened" } else { "closed" },
                self.a,
                self.b
            );
        }
        self.pressed = true;
        changed
    }

    /// Whether the plate has been stepped on at least once.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
