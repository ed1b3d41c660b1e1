//! Turning per-tick input into body velocity.

use glam::Vec3;

use crate::body::{MovingBody, PhysicsConfig};

/// Movement input for one tick. Axes are in `[-1, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveIntent {
    /// Positive walks forward.
    pub forward: f32,
    /// Positive strafes right.
    pub strafe: f32,
    /// Jump is held.
    pub jump: bool,
    pub sneak: bool,
    pub sprint: bool,
    /// Flight mode: rise.
    pub ascend: bool,
    /// Flight mode: sink.
    pub descend: bool,
}

/// Horizontal movement basis `(forward, right)` from the camera's right vector.
///
/// Built from the right vector rather than the view direction so that looking
/// straight up or down still yields a usable forward. A degenerate right
/// vector falls back to +X.
pub fn walk_basis(right: Vec3) -> (Vec3, Vec3) {
    let right_h = Vec3::new(right.x, 0.0, right.z)
        .try_normalize()
        .unwrap_or(Vec3::X);
    let forward_h = Vec3::Y.cross(right_h).normalize_or_zero();
    (forward_h, right_h)
}

/// Sets the body's horizontal velocity (and vertical, in flight) from `intent`.
///
/// Sneaking halves the speed and takes precedence over sprinting, which
/// multiplies it by 1.5. Diagonal input never exceeds the mode speed. A jump
/// starts only when grounded with the jump lock clear; releasing jump clears
/// the lock.
pub fn apply_move_intent(
    body: &mut MovingBody,
    intent: &MoveIntent,
    right: Vec3,
    config: &PhysicsConfig,
) {
    let (forward_h, right_h) = walk_basis(right);
    body.sneaking = intent.sneak;

    let base = if body.flight {
        config.fly_speed
    } else {
        config.walk_speed
    };
    let speed = if intent.sneak {
        base * config.sneak_multiplier
    } else if intent.sprint {
        base * config.sprint_multiplier
    } else {
        base
    };

    let fwd = intent.forward.clamp(-1.0, 1.0);
    let side = intent.strafe.clamp(-1.0, 1.0);
    let mut planar = forward_h * (fwd * speed) + right_h * (side * speed);
    planar.y = 0.0;
    let len = planar.length();
    if len > speed && len > 0.0 {
        planar *= speed / len;
    }
    body.velocity.x = planar.x;
    body.velocity.z = planar.z;

    if body.flight {
        let vertical = match (intent.ascend, intent.descend) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        body.velocity.y = vertical * speed;
        return;
    }

    if intent.jump {
        if body.grounded && !body.jump_lock {
            body.velocity.y = config.jump_speed;
            body.grounded = false;
            body.jump_lock = true;
        }
    } else {
        body.jump_lock = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
