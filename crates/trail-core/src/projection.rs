//! World-to-screen projection.
//!
//! Closest-node queries compare distances on the projected plane rather than
//! in world space, so that a click near a node's on-screen image selects it
//! even when another node is nearer in depth.

use crate::geom::{Vec2, Vec3};

/// Maps world positions onto a 2D plane.
pub trait Projector {
    /// Project `world` to screen space.
    fn project(&self, world: Vec3) -> Vec2;
}

impl<F> Projector for F
where
    F: Fn(Vec3) -> Vec2,
{
    #[inline]
    fn project(&self, world: Vec3) -> Vec2 {
        self(world)
    }
}

/// Straight-down orthographic view: drops the height axis.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopDown;

impl Projector for TopDown {
    #[inline]
    fn project(&self, world: Vec3) -> Vec2 {
        // North is up on screen.
        Vec2::new(world.x, -world.z)
    }
}

/// Orthographic camera rotated `yaw` radians about the up axis and tilted
/// `pitch` radians below the horizon.
///
/// With the default (45°, 30°) nodes stacked vertically can line up with
/// nodes further back, which is what makes screen-space selection differ
/// from world-space selection.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Isometric {
    pub yaw: f32,
    pub pitch: f32,
    pub scale: f32,
}

impl Isometric {
    /// Create a camera from angles in radians and a pixels-per-unit scale.
    pub const fn new(yaw: f32, pitch: f32, scale: f32) -> Self {
        Self { yaw, pitch, scale }
    }
}

impl Default for Isometric {
    fn default() -> Self {
        Self::new(
            std::f32::consts::FRAC_PI_4,
            std::f32::consts::FRAC_PI_6,
            1.0,
        )
    }
}

impl Projector for Isometric {
    fn project(&self, world: Vec3) -> Vec2 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        let right = world.x * cy - world.z * sy;
        let depth = world.x * sy + world.z * cy;
        // Camera up is (0, cos p, sin p) in the yawed frame; screen Y grows down.
        let up = world.y * cp + depth * sp;
        Vec2::new(right * self.scale, -up * self.scale)
    }
}
