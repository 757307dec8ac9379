//! Level descriptions and the loaded [`Level`].
//!
//! A level is built once and owns its [`Graph`] and [`Pathfinder`]; agents
//! receive the level explicitly instead of looking either up globally.

use std::fmt;

use trail_core::{Projector, Vec3};
use trail_paths::{
    BuildError, Graph, GraphBuilder, GraphConfig, NodeId, Pathfinder, PathfinderConfig,
};

use crate::blueprint::{Blueprint, BlueprintError, Tile};
use crate::plate::PressurePlate;
use crate::walker::{WalkEvent, Walker, WalkerConfig};

// ---------------------------------------------------------------------------
// Description
// ---------------------------------------------------------------------------

/// One node of a [`LevelData`]. Indices refer to positions in
/// [`LevelData::nodes`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeData {
    pub position: Vec3,
    #[cfg_attr(feature = "serde", serde(default))]
    pub label: Option<String>,
    /// Nodes this one must not auto-connect to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub excluded: Vec<u32>,
}

/// A pressure plate: stepping on `at` sets the `a`-`b` link to `enables`.
/// The link starts in the opposite state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlateData {
    pub at: u32,
    pub a: u32,
    pub b: u32,
    #[cfg_attr(feature = "serde", serde(default = "enables_by_default"))]
    pub enables: bool,
}

#[cfg(feature = "serde")]
fn enables_by_default() -> bool {
    true
}

/// Everything needed to build a level.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelData {
    pub nodes: Vec<NodeData>,
    pub goal: Option<u32>,
    pub spawn: Option<u32>,
    pub plates: Vec<PlateData>,
    /// Links that start switched off, both directions.
    pub disabled_links: Vec<(u32, u32)>,
}

impl LevelData {
    /// Describe the walkable tiles of a blueprint. Markers become labels.
    pub fn from_blueprint(blueprint: &Blueprint) -> Self {
        let mut data = Self::default();
        for (i, (position, tile)) in blueprint.tiles().into_iter().enumerate() {
            let i = i as u32;
            let label = match tile {
                Tile::Walk => None,
                Tile::Spawn => {
                    data.spawn = Some(i);
                    None
                }
                Tile::Goal => {
                    data.goal = Some(i);
                    None
                }
                Tile::Marker(ch) => Some(ch.to_string()),
            };
            data.nodes.push(NodeData {
                position,
                label,
                excluded: Vec::new(),
            });
        }
        data
    }

    /// Index of the first node labelled `label`.
    pub fn index_of(&self, label: &str) -> Option<u32> {
        self.nodes
            .iter()
            .position(|n| n.label.as_deref() == Some(label))
            .map(|i| i as u32)
    }

    fn require(&self, label: &str) -> Result<u32, LevelError> {
        self.index_of(label)
            .ok_or_else(|| LevelError::UnknownLabel(label.to_string()))
    }

    /// Add a plate by node labels.
    pub fn add_plate(
        &mut self,
        at: &str,
        a: &str,
        b: &str,
        enables: bool,
    ) -> Result<&mut Self, LevelError> {
        let plate = PlateData {
            at: self.require(at)?,
            a: self.require(a)?,
            b: self.require(b)?,
            enables,
        };
        self.plates.push(plate);
        Ok(self)
    }

    /// Keep two labelled nodes from auto-connecting in either direction.
    pub fn exclude_labels(&mut self, a: &str, b: &str) -> Result<&mut Self, LevelError> {
        let (ia, ib) = (self.require(a)?, self.require(b)?);
        self.nodes[ia as usize].excluded.push(ib);
        self.nodes[ib as usize].excluded.push(ia);
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Loaded level
// ---------------------------------------------------------------------------

/// Settings for every part of a level.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LevelConfig {
    pub graph: GraphConfig,
    pub pathfinder: PathfinderConfig,
    pub walker: WalkerConfig,
}

/// A loaded level: graph, pathfinder, plates and spawn point.
#[derive(Clone, Debug)]
pub struct Level {
    graph: Graph,
    pathfinder: Pathfinder,
    plates: Vec<PressurePlate>,
    spawn: Option<NodeId>,
    walker_config: WalkerConfig,
}

impl Level {
    /// Parse a blueprint and build a level from it (no plates).
    pub fn parse(text: &str, config: LevelConfig) -> Result<Self, LevelError> {
        Self::from_blueprint(&Blueprint::new(text)?, config)
    }

    pub fn from_blueprint(blueprint: &Blueprint, config: LevelConfig) -> Result<Self, LevelError> {
        Self::from_data(&LevelData::from_blueprint(blueprint), config)
    }

    pub fn from_data(data: &LevelData, config: LevelConfig) -> Result<Self, LevelError> {
        let len = data.nodes.len() as u32;
        let node = |i: u32| {
            if i < len {
                Ok(NodeId(i))
            } else {
                Err(LevelError::UnknownNode(i))
            }
        };

        let mut builder = GraphBuilder::with_config(config.graph);
        for n in &data.nodes {
            builder.add_node(n.position);
        }
        for (i, n) in data.nodes.iter().enumerate() {
            let id = NodeId(i as u32);
            if let Some(label) = &n.label {
                builder.label(id, label.clone());
            }
            for &other in &n.excluded {
                builder.exclude(id, node(other)?);
            }
        }
        if let Some(goal) = data.goal {
            builder.set_goal(node(goal)?);
        }
        let spawn = data.spawn.map(node).transpose()?;

        let mut graph = builder.connect()?;

        let mut plates = Vec::with_capacity(data.plates.len());
        for p in &data.plates {
            let plate = PressurePlate::new(node(p.at)?, node(p.a)?, node(p.b)?, p.enables);
            plate.arm(&mut graph);
            plates.push(plate);
        }
        for &(a, b) in &data.disabled_links {
            graph.set_link(node(a)?, node(b)?, false);
        }

        log::debug!(
            "level loaded: {} nodes, {} edges, {} plates",
            graph.len(),
            graph.edge_count(),
            plates.len()
        );

        Ok(Self {
            graph,
            pathfinder: Pathfinder::with_config(config.pathfinder),
            plates,
            spawn,
            walker_config: config.walker,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }

    pub fn plates(&self) -> &[PressurePlate] {
        &self.plates
    }

    pub fn spawn(&self) -> Option<NodeId> {
        self.spawn
    }

    pub fn goal(&self) -> Option<NodeId> {
        self.graph.goal()
    }

    /// A walker standing on the spawn node.
    pub fn spawn_walker(&self) -> Option<Walker> {
        let spawn = self.spawn?;
        let mut walker = Walker::with_config(self.graph.position(spawn)?, self.walker_config);
        walker.place(&self.graph, spawn);
        Some(walker)
    }

    /// Bind the pathfinder's start to the node closest to `position` on
    /// screen.
    pub fn set_start_node<P>(&mut self, position: Vec3, projector: &P) -> Option<NodeId>
    where
        P: Projector + ?Sized,
    {
        self.pathfinder.set_start_node(&self.graph, position, projector);
        self.pathfinder.start()
    }

    /// Every node labelled `label`, e.g. all cells of one clickable block.
    pub fn region(&self, label: &str) -> Vec<NodeId> {
        self.graph
            .nodes()
            .iter()
            .filter(|n| n.label() == Some(label))
            .map(|n| n.id())
            .collect()
    }

    /// Send `walker` along the shortest path to any of `candidates`.
    ///
    /// Ignored while the walker is moving or off the graph. Returns whether
    /// a walk started.
    pub fn route(&mut self, walker: &mut Walker, candidates: &[NodeId]) -> bool {
        if walker.is_moving() {
            return false;
        }
        let Some(from) = walker.current_node() else {
            return false;
        };
        let path = self.pathfinder.find_best_path(&self.graph, from, candidates);
        walker.follow(path)
    }

    /// Fire every plate at `node`. Returns how many fired.
    pub fn enter(&mut self, node: NodeId) -> usize {
        let mut fired = 0;
        for plate in self.plates.iter_mut().filter(|p| p.at == node) {
            plate.press(&mut self.graph);
            fired += 1;
        }
        fired
    }

    /// Advance `walker` by `dt` seconds, firing plates on the nodes it
    /// enters.
    pub fn step(&mut self, walker: &mut Walker, dt: f32) -> Vec<WalkEvent> {
        let events = walker.tick(dt, &self.graph);
        for event in &events {
            if let WalkEvent::Entered(node) = *event {
                self.enter(node);
            }
        }
        events
    }

    /// Whether `walker` stands on the goal.
    pub fn is_won(&self, walker: &Walker) -> bool {
        walker.has_reached_goal(&self.graph)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a level.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    Blueprint(BlueprintError),
    Build(BuildError),
    /// A node index past the end of [`LevelData::nodes`].
    UnknownNode(u32),
    /// No node carries this label.
    UnknownLabel(String),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blueprint(e) => write!(f, "level: {e}"),
            Self::Build(e) => write!(f, "level: {e}"),
            Self::UnknownNode(i) => write!(f, "level: unknown node index {i}"),
            Self::UnknownLabel(l) => write!(f, "level: no node labelled {l:?}"),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Blueprint(e) => Some(e),
            Self::Build(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BlueprintError> for LevelError {
    fn from(e: BlueprintError) -> Self {
        Self::Blueprint(e)
    }
}

impl From<BuildError> for LevelError {
    fn from(e: BuildError) -> Self {
        Self::Build(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use trail_paths::DuplicatePolicy;

    // The a-b link is the bridge; p is the plate that lowers it.
    const BRIDGE: &str = "S.p.ab.G";

    fn bridge_level() -> Level {
        let bp = Blueprint::new(BRIDGE).unwrap();
        let mut data = LevelData::from_blueprint(&bp);
        data.add_plate("p", "a", "b", true).unwrap();
        Level::from_data(&data, LevelConfig::default()).unwrap()
    }

    fn walk_until_idle(level: &mut Level, walker: &mut Walker) -> Vec<WalkEvent> {
        let mut events = Vec::new();
        for _ in 0..200 {
            if !walker.is_moving() {
                break;
            }
            events.extend(level.step(walker, 0.1));
        }
        events
    }

    #[test]
    fn blueprint_description() {
        let bp = Blueprint::new(BRIDGE).unwrap();
        let data = LevelData::from_blueprint(&bp);
        assert_eq!(data.nodes.len(), 8);
        assert_eq!(data.spawn, Some(0));
        assert_eq!(data.goal, Some(7));
        assert_eq!(data.index_of("a"), Some(4));
        assert_eq!(data.index_of("z"), None);
    }

    #[test]
    fn plate_starts_armed() {
        let level = bridge_level();
        let (a, b) = (NodeId(4), NodeId(5));
        assert!(!level.graph().is_edge_active(a, b));
        assert!(!level.graph().is_edge_active(b, a));
        assert_eq!(level.plates().len(), 1);
        assert!(!level.plates()[0].is_pressed());
    }

    #[test]
    fn goal_unreachable_until_plate_pressed() {
        let mut level = bridge_level();
        let mut walker = level.spawn_walker().unwrap();
        assert_eq!(walker.current_node(), level.spawn());

        let goal = level.goal().unwrap();
        assert!(!level.route(&mut walker, &[goal]));
        assert!(level.pathfinder().path().is_empty());

        let plate = level.region("p");
        assert!(level.route(&mut walker, &plate));
        // Routing again mid-walk is ignored.
        assert!(!level.route(&mut walker, &[goal]));
        let events = walk_until_idle(&mut level, &mut walker);
        assert!(events.contains(&WalkEvent::Entered(NodeId(2))));
        assert_eq!(events.last(), Some(&WalkEvent::Arrived(NodeId(2))));
        assert!(level.plates()[0].is_pressed());

        assert!(level.route(&mut walker, &[goal]));
        assert_eq!(level.pathfinder().path().len(), 6);
        walk_until_idle(&mut level, &mut walker);
        assert!(level.is_won(&walker));
    }

    #[test]
    fn regions_collect_all_marked_cells() {
        let level = Level::parse("S.qq\n..q.", LevelConfig::default()).unwrap();
        assert_eq!(level.region("q").len(), 3);
        assert!(level.region("r").is_empty());
        assert_eq!(level.goal(), None);
    }

    #[test]
    fn route_prefers_nearest_region_cell() {
        let mut level = Level::parse("S.qq\n..q.", LevelConfig::default()).unwrap();
        let mut walker = level.spawn_walker().unwrap();
        let region = level.region("q");
        assert!(level.route(&mut walker, &region));
        // (2, 0) is two steps away, the other q cells three.
        assert_eq!(level.pathfinder().destination(), Some(region[0]));
        assert_eq!(walker.remaining().len(), 2);
    }

    #[test]
    fn disabled_links_and_exclusions() {
        let bp = Blueprint::new("Sab.").unwrap();
        let mut data = LevelData::from_blueprint(&bp);
        data.exclude_labels("a", "b").unwrap();
        data.disabled_links.push((0, 1));
        let level = Level::from_data(&data, LevelConfig::default()).unwrap();
        let g = level.graph();
        assert!(g.edge(NodeId(1), NodeId(2)).is_none());
        assert!(g.edge(NodeId(2), NodeId(1)).is_none());
        assert!(!g.is_edge_active(NodeId(0), NodeId(1)));
        assert!(g.is_edge_active(NodeId(2), NodeId(3)));
    }

    #[test]
    fn bad_indices_are_reported() {
        let mut data = LevelData::from_blueprint(&Blueprint::new("S.").unwrap());
        data.plates.push(PlateData {
            at: 0,
            a: 1,
            b: 9,
            enables: true,
        });
        let err = Level::from_data(&data, LevelConfig::default()).unwrap_err();
        assert_eq!(err, LevelError::UnknownNode(9));

        let mut data = LevelData::from_blueprint(&Blueprint::new("S.").unwrap());
        data.goal = Some(5);
        assert!(matches!(
            Level::from_data(&data, LevelConfig::default()),
            Err(LevelError::UnknownNode(5))
        ));

        let mut data = LevelData::default();
        let err = data.add_plate("p", "a", "b", true).unwrap_err();
        assert_eq!(err.to_string(), "level: no node labelled \"p\"");
    }

    #[test]
    fn errors_chain_to_their_source() {
        let err = Level::parse("S.\n.?", LevelConfig::default()).unwrap_err();
        assert!(matches!(err, LevelError::Blueprint(_)));
        assert!(err.source().is_some());

        let data = LevelData {
            nodes: vec![NodeData::default(), NodeData::default()],
            ..LevelData::default()
        };
        let config = LevelConfig {
            graph: GraphConfig {
                duplicates: DuplicatePolicy::Reject,
                ..GraphConfig::default()
            },
            ..LevelConfig::default()
        };
        let err = Level::from_data(&data, config).unwrap_err();
        assert!(matches!(err, LevelError::Build(BuildError::DuplicatePosition { .. })));
        assert!(err.source().is_some());
    }

    #[test]
    fn start_binds_to_closest_node() {
        let mut level = bridge_level();
        let bound = level.set_start_node(Vec3::new(2.8, 0.0, 0.3), &trail_core::TopDown);
        assert_eq!(bound, Some(NodeId(3)));
        assert_eq!(level.pathfinder().start(), Some(NodeId(3)));
    }

    #[test]
    fn no_spawn_no_walker() {
        let level = Level::parse("..G", LevelConfig::default()).unwrap();
        assert!(level.spawn_walker().is_none());
    }
}
