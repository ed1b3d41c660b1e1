//! Yaw/pitch view orientation.

use glam::Vec3;
use strata_visibility::look_direction;

/// View orientation in radians.
///
/// Yaw 0 looks down +Z and grows towards +X; positive pitch looks up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Look {
    pub yaw: f32,
    pub pitch: f32,
    /// Pitch is clamped to ±`pitch_limit`.
    pub pitch_limit: f32,
}

impl Default for Look {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            pitch_limit: 89.0_f32.to_radians(),
        }
    }
}

impl Look {
    /// Orientation facing `forward`.
    pub fn facing(forward: Vec3) -> Self {
        let mut look = Self::default();
        if let Some(f) = forward.try_normalize() {
            look.yaw = f.x.atan2(f.z);
            look.pitch = f.y.clamp(-1.0, 1.0).asin();
            look.pitch = look.pitch.clamp(-look.pitch_limit, look.pitch_limit);
        }
        look
    }

    /// Turns by `(d_yaw, d_pitch)` radians, clamping pitch.
    pub fn turn(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = (self.yaw + d_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + d_pitch).clamp(-self.pitch_limit, self.pitch_limit);
    }

    pub fn forward(&self) -> Vec3 {
        look_direction(self.yaw, self.pitch)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_recovers_direction() {
        let dir = Vec3::new(1.0, 0.5, -2.0).normalize();
        let look = Look::facing(dir);
        assert!((look.forward() - dir).length() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut look = Look::default();
        look.turn(0.0, 10.0);
        assert!((look.pitch - look.pitch_limit).abs() < 1e-6);
        assert!(look.forward().y < 1.0);
        let straight_down = Look::facing(Vec3::NEG_Y);
        assert!((straight_down.pitch + straight_down.pitch_limit).abs() < 1e-6);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut look = Look::default();
        look.turn(-std::f32::consts::FRAC_PI_2, 0.0);
        assert!(look.yaw > 0.0);
        assert!((look.forward() - Vec3::NEG_X).length() < 1e-5);
    }
}
