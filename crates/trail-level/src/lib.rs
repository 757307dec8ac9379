//! Level-side collaborators of the trail pathfinding engine.
//!
//! - [`Blueprint`]: ASCII level plans
//! - [`LevelData`]: a serializable level description
//! - [`Level`]: a loaded level owning its graph and pathfinder
//! - [`PressurePlate`]: switches a link when stepped on
//! - [`Walker`]: follows a path as a sequence of waypoints

pub mod blueprint;
pub mod level;
pub mod plate;
pub mod walker;

pub use blueprint::{Blueprint, BlueprintError, Tile};
pub use level::{Level, LevelConfig, LevelData, LevelError, NodeData, PlateData};
pub use plate::PressurePlate;
pub use walker::{WalkEvent, Walker, WalkerConfig};
