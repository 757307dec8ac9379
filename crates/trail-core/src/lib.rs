//! **trail-core** — geometry primitives for the *trail* pathfinding engine.
//!
//! This crate provides the spatial types shared across the workspace: world
//! positions ([`Vec3`]), screen positions ([`Vec2`]) and the [`Projector`]
//! seam used to compare positions the way a camera sees them.

pub mod geom;
pub mod projection;

pub use geom::{Vec2, Vec3};
pub use projection::{Isometric, Projector, TopDown};
