//! Node-graph pathfinding with toggleable edges.
//!
//! A level is described as a set of spatial nodes. [`GraphBuilder`] collects
//! them, then [`GraphBuilder::connect`] links every node to the nodes one unit
//! away along the four horizontal axes and returns a [`Graph`] whose topology
//! is fixed but whose edges can be switched on and off at any time.
//!
//! [`Pathfinder`] answers fewest-steps queries over the graph with a bounded
//! breadth-first search:
//!
//! - **single destination** ([`Pathfinder::find_path`])
//! - **best of several candidates** ([`Pathfinder::find_best_path`])
//!
//! Like the rest of the crate, the pathfinder owns and reuses its working
//! sets, so repeated queries do not allocate after warm-up.
//!
//! # Example
//!
//! ```
//! use trail_core::Vec3;
//! use trail_paths::{GraphBuilder, Pathfinder};
//!
//! let mut builder = GraphBuilder::new();
//! let a = builder.add_node(Vec3::new(0.0, 0.0, 0.0));
//! let b = builder.add_node(Vec3::new(1.0, 0.0, 0.0));
//! let c = builder.add_node(Vec3::new(2.0, 0.0, 0.0));
//! let mut graph = builder.connect().unwrap();
//!
//! let mut pf = Pathfinder::new();
//! assert_eq!(pf.find_path(&graph, a, c), vec![a, b, c]);
//!
//! graph.set_link(b, c, false);
//! assert!(pf.find_path(&graph, a, c).is_empty());
//! assert!(pf.is_search_complete() && !pf.is_path_complete());
//! ```

mod best;
mod bfs;
mod builder;
mod graph;
mod node;
mod pathfinder;
mod traits;

pub use builder::{BuildError, DuplicatePolicy, GraphBuilder, GraphConfig};
pub use graph::Graph;
pub use node::{Edge, NEIGHBOR_DIRECTIONS, Node, NodeId};
pub use pathfinder::{Breadcrumbs, Pathfinder, PathfinderConfig, SearchStatus};
pub use traits::Topology;
