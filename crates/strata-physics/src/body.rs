//! The player-controlled moving body and its tuning constants.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strata_voxel::VoxelKind;

/// Which volume stands in for the body during collision.
///
/// The two shapes differ at block corners. The box overlaps a corner as soon
/// as its footprint touches it, so a body walking diagonally past a pillar
/// stops dead ("catches") until it backs off. The capsule's rounded sides
/// only touch a corner within `capsule_radius` of its axis, so the same walk
/// slides past the pillar. The box is also flush with block faces; the
/// capsule leaves a small gap at the top and bottom edges of a step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionShape {
    /// Axis-aligned box `box_width` wide and deep, `body_height` tall.
    #[default]
    Box,
    /// Vertical stack of `capsule_samples` spheres of `capsule_radius`.
    Capsule,
}

/// Movement and collision constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in blocks/s².
    pub gravity: f32,
    /// Maximum fall speed in blocks/s.
    pub terminal_velocity: f32,
    /// Upward speed applied by a jump, blocks/s.
    pub jump_speed: f32,
    /// Horizontal walking speed, blocks/s.
    pub walk_speed: f32,
    /// Speed multiplier while sneaking.
    pub sneak_multiplier: f32,
    /// Speed multiplier while sprinting.
    pub sprint_multiplier: f32,
    /// Horizontal and vertical speed in flight mode, blocks/s.
    pub fly_speed: f32,
    pub shape: CollisionShape,
    pub body_height: f32,
    pub box_width: f32,
    pub capsule_radius: f32,
    /// Spheres used to sample the capsule (at least 2).
    pub capsule_samples: u32,
    /// Camera height above the feet.
    pub eye_height: f32,
    /// Distance below the feet probed for ground after each step.
    pub ground_probe: f32,
    /// Half-size of the support grid sampled by the ledge guard.
    pub ledge_half_extent: f32,
    /// Spacing of the ledge guard's support grid.
    pub ledge_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 35.0,
            terminal_velocity: 50.0,
            jump_speed: 11.9,
            walk_speed: 5.5,
            sneak_multiplier: 0.5,
            sprint_multiplier: 1.5,
            fly_speed: 10.0,
            shape: CollisionShape::Box,
            body_height: 1.9,
            box_width: 0.6,
            capsule_radius: 0.35,
            capsule_samples: 4,
            eye_height: 1.8,
            ground_probe: 0.1,
            ledge_half_extent: 0.3,
            ledge_step: 0.08,
        }
    }
}

/// A body moving through the voxel field.
///
/// `position` is the bottom centre of the body (the point between the feet).
#[derive(Clone, Debug, PartialEq)]
pub struct MovingBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub grounded: bool,
    /// Set by a jump; cleared on landing or when jump is released.
    pub jump_lock: bool,
    /// Gravity off, vertical motion from input.
    pub flight: bool,
    /// Collision off; implies never grounded.
    pub noclip: bool,
    /// Sneaking halves speed and enables the ledge guard.
    pub sneaking: bool,
    /// Kind written by a place action.
    pub selected: VoxelKind,
}

impl MovingBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            grounded: false,
            jump_lock: false,
            flight: false,
            noclip: false,
            sneaking: false,
            selected: VoxelKind::Stone,
        }
    }

    /// Eye position for a body of the given configuration.
    pub fn eye(&self, config: &PhysicsConfig) -> Vec3 {
        self.position + Vec3::Y * config.eye_height
    }

    /// Moves the body instantly and stops it.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.grounded = false;
        self.jump_lock = false;
    }

    /// Axis-aligned bounds of the body's volume at its current position.
    pub fn bounds(&self, config: &PhysicsConfig) -> (Vec3, Vec3) {
        bounds_at(self.position, config)
    }

    pub fn toggle_flight(&mut self) {
        self.flight = !self.flight;
        self.velocity.y = 0.0;
        tracing::debug!("flight {}", if self.flight { "on" } else { "off" });
    }

    pub fn toggle_noclip(&mut self) {
        self.noclip = !self.noclip;
        self.grounded = false;
        tracing::debug!("noclip {}", if self.noclip { "on" } else { "off" });
    }
}

/// Bounds of a body whose feet are at `feet`.
pub fn bounds_at(feet: Vec3, config: &PhysicsConfig) -> (Vec3, Vec3) {
    let half = match config.shape {
        CollisionShape::Box => config.box_width * 0.5,
        CollisionShape::Capsule => config.capsule_radius,
    };
    (
        feet - Vec3::new(half, 0.0, half),
        feet + Vec3::new(half, config.body_height, half),
    )
}
