//! Camera pose and the angular tests used by chunk and block culling.
//!
//! Instead of extracting clip planes from a projection matrix, the tests
//! compare the tangent of the angle to a target (its projection on the
//! right/up axes over its depth) against the half-FOV tangents.

use glam::Vec3;

use crate::config::RenderConfig;

/// Unit view direction from yaw and pitch in radians.
///
/// Yaw 0 looks down +Z and grows towards +X; positive pitch looks up.
pub fn look_direction(yaw: f32, pitch: f32) -> Vec3 {
    let (sy, cy) = yaw.sin_cos();
    let (sp, cp) = pitch.sin_cos();
    Vec3::new(sy * cp, sp, cy * cp)
}

/// Eye position, orthonormal view basis and the precomputed half-FOV tangents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewFrustum {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub render_distance: f32,
    tan_half_v: f32,
    tan_half_h: f32,
}

impl ViewFrustum {
    /// Builds a frustum at `position` looking along `forward`.
    ///
    /// A zero `forward` looks down -Z. When looking straight up or down the
    /// right axis falls back to +X.
    pub fn new(position: Vec3, forward: Vec3, config: &RenderConfig) -> Self {
        let forward = forward.try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward).normalize_or_zero();
        let half_v = (config.fov_y_degrees.clamp(1.0, 179.0) * 0.5).to_radians();
        let tan_half_v = half_v.tan();
        Self {
            position,
            forward,
            right,
            up,
            render_distance: config.render_distance,
            tan_half_v,
            tan_half_h: tan_half_v * config.aspect.max(f32::EPSILON),
        }
    }

    pub fn tan_half_vertical(&self) -> f32 {
        self.tan_half_v
    }

    pub fn tan_half_horizontal(&self) -> f32 {
        self.tan_half_h
    }

    /// Conservative test of a bounding sphere against the view cone.
    ///
    /// Only rejects spheres entirely behind the eye or entirely outside one of
    /// the four side planes.
    pub fn sphere_in_cone(&self, center: Vec3, radius: f32) -> bool {
        let to = center - self.position;
        let depth = to.dot(self.forward);
        if depth < -radius {
            return false;
        }
        let rp = to.dot(self.right);
        let up = to.dot(self.up);
        let side = |lateral: f32, tan: f32| {
            // Signed distance from the side plane, positive outside.
            (lateral.abs() - depth * tan) / (1.0 + tan * tan).sqrt() <= radius
        };
        side(rp, self.tan_half_h) && side(up, self.tan_half_v)
    }

    /// Field-of-view test for a unit voxel centred at `center`, `dist` away.
    ///
    /// The half-FOV tangents are widened by the angle the voxel's half-width
    /// subtends at that distance.
    pub fn block_in_fov(&self, center: Vec3, dist: f32) -> bool {
        if dist < 0.1 {
            return true;
        }
        let dir = (center - self.position) / dist;
        let depth = dir.dot(self.forward);
        if depth <= 0.0 {
            return false;
        }
        let margin = (0.5 / dist.max(0.5)).atan();
        let tan_x = dir.dot(self.right).abs() / depth;
        let tan_y = dir.dot(self.up).abs() / depth;
        tan_x <= self.tan_half_h + margin && tan_y <= self.tan_half_v + margin
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frustum(forward: Vec3) -> ViewFrustum {
        ViewFrustum::new(Vec3::ZERO, forward, &RenderConfig::default())
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let f = frustum(Vec3::new(0.3, -0.4, -1.0));
        assert!((f.forward.length() - 1.0).abs() < 1e-5);
        assert!(f.forward.dot(f.right).abs() < 1e-5);
        assert!(f.forward.dot(f.up).abs() < 1e-5);
        assert!(f.right.y.abs() < 1e-5);
        assert!(f.up.y > 0.0);
    }

    #[test]
    fn test_looking_down_neg_z_has_right_pos_x() {
        let f = frustum(Vec3::NEG_Z);
        assert!((f.right - Vec3::X).length() < 1e-5);
        assert!((f.up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_vertical_view_falls_back() {
        let f = frustum(Vec3::NEG_Y);
        assert_eq!(f.right, Vec3::X);
    }

    #[test]
    fn test_look_direction_matches_yaw() {
        assert!((look_direction(0.0, 0.0) - Vec3::Z).length() < 1e-6);
        let east = look_direction(std::f32::consts::FRAC_PI_2, 0.0);
        assert!((east - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_block_behind_is_rejected() {
        let f = frustum(Vec3::NEG_Z);
        let c = Vec3::new(0.0, 0.0, 20.0);
        assert!(!f.block_in_fov(c, c.length()));
        let ahead = Vec3::new(0.0, 0.0, -20.0);
        assert!(f.block_in_fov(ahead, ahead.length()));
    }

    #[test]
    fn test_block_outside_horizontal_fov_is_rejected() {
        let f = frustum(Vec3::NEG_Z);
        // Far to the side: tan = 40 / 5 = 8, well past the half-FOV tangent.
        let c = Vec3::new(40.0, 0.0, -5.0);
        assert!(!f.block_in_fov(c, c.length()));
    }

    #[test]
    fn test_sphere_behind_is_rejected() {
        let f = frustum(Vec3::NEG_Z);
        assert!(!f.sphere_in_cone(Vec3::new(0.0, 0.0, 100.0), 20.0));
        // Straddling the eye.
        assert!(f.sphere_in_cone(Vec3::new(0.0, 0.0, 10.0), 20.0));
        assert!(f.sphere_in_cone(Vec3::new(0.0, 0.0, -100.0), 1.0));
    }
}
