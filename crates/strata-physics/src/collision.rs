//! Voxel-accurate collision with axis-separated sliding.
//!
//! Each step moves the body along X, then Y, then Z, re-testing the shape
//! after each axis against the position reached so far. The order decides
//! which surface wins in corners and must not change.

use glam::{IVec3, Vec3};
use strata_voxel::VoxelRead;

use crate::body::{CollisionShape, MovingBody, PhysicsConfig, bounds_at};

/// Bisection rounds used to settle onto a surface after a blocked vertical move.
const SETTLE_ITERATIONS: u32 = 8;

/// Height below the feet at which the ledge guard looks for support.
const LEDGE_SAMPLE_DEPTH: f32 = 0.05;

/// What happened during one [`step_collision`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub blocked_x: bool,
    pub blocked_y: bool,
    pub blocked_z: bool,
    /// The body became grounded this step.
    pub landed: bool,
    /// The ledge guard cancelled horizontal movement.
    pub ledge_stopped: bool,
}

/// Returns `true` if a body with its feet at `feet` overlaps any solid voxel.
pub fn collides(grid: &dyn VoxelRead, feet: Vec3, config: &PhysicsConfig) -> bool {
    match config.shape {
        CollisionShape::Box => box_collides(grid, feet, config),
        CollisionShape::Capsule => capsule_collides(grid, feet, config),
    }
}

/// Strict AABB overlap against every solid cell near the box, with one cell
/// of margin around the scanned range.
fn box_collides(grid: &dyn VoxelRead, feet: Vec3, config: &PhysicsConfig) -> bool {
    let (min, max) = bounds_at(feet, config);
    let lo = (min - Vec3::ONE).floor().as_ivec3();
    let hi = (max + Vec3::ONE).ceil().as_ivec3();
    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                let cell = IVec3::new(x, y, z);
                if !grid.is_solid(cell) {
                    continue;
                }
                let c_min = cell.as_vec3();
                let c_max = c_min + Vec3::ONE;
                if max.x > c_min.x
                    && min.x < c_max.x
                    && max.y > c_min.y
                    && min.y < c_max.y
                    && max.z > c_min.z
                    && min.z < c_max.z
                {
                    return true;
                }
            }
        }
    }
    false
}

/// Spheres evenly spaced along the body axis, each tested against the
/// closest point of every nearby solid cell.
fn capsule_collides(grid: &dyn VoxelRead, feet: Vec3, config: &PhysicsConfig) -> bool {
    let r = config.capsule_radius;
    let samples = config.capsule_samples.max(2);
    let bottom = feet.y + r;
    let top = (feet.y + config.body_height - r).max(bottom);
    let spacing = (top - bottom) / (samples - 1) as f32;

    (0..samples).any(|i| {
        let center = Vec3::new(feet.x, bottom + spacing * i as f32, feet.z);
        sphere_collides(grid, center, r)
    })
}

fn sphere_collides(grid: &dyn VoxelRead, center: Vec3, radius: f32) -> bool {
    let lo = (center - Vec3::splat(radius + 1.0)).floor().as_ivec3();
    let hi = (center + Vec3::splat(radius + 1.0)).ceil().as_ivec3();
    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                let cell = IVec3::new(x, y, z);
                if !grid.is_solid(cell) {
                    continue;
                }
                let c_min = cell.as_vec3();
                let closest = center.clamp(c_min, c_min + Vec3::ONE);
                if center.distance_squared(closest) < radius * radius {
                    return true;
                }
            }
        }
    }
    false
}

/// Returns `true` if any point of the ledge guard's grid under `feet` is solid.
fn has_support(grid: &dyn VoxelRead, feet: Vec3, config: &PhysicsConfig) -> bool {
    let half = config.ledge_half_extent;
    let step = config.ledge_step.max(0.01);
    let y = (feet.y - LEDGE_SAMPLE_DEPTH).floor() as i32;
    let n = (2.0 * half / step).floor() as i32;
    for i in 0..=n {
        let dx = -half + step * i as f32;
        for j in 0..=n {
            let dz = -half + step * j as f32;
            let cell = IVec3::new(
                (feet.x + dx).floor() as i32,
                y,
                (feet.z + dz).floor() as i32,
            );
            if grid.is_solid(cell) {
                return true;
            }
        }
    }
    false
}

/// Advances `body` by `dt` seconds against the voxel field.
///
/// Gravity (unless flying) is applied first and clamped to the terminal fall
/// speed, then the body slides X → Y → Z. A blocked downward Y move grounds
/// the body, zeroes vertical velocity and releases the jump lock. Finally the
/// ground is probed just below the feet; the probe is ignored while moving
/// upward so a jump is not cancelled on its first step. In no-clip mode the
/// body moves freely and is never grounded.
pub fn step_collision(
    body: &mut MovingBody,
    grid: &dyn VoxelRead,
    config: &PhysicsConfig,
    dt: f32,
) -> StepReport {
    let mut report = StepReport::default();

    if body.noclip {
        body.position += body.velocity * dt;
        body.grounded = false;
        return report;
    }

    if !body.flight {
        body.velocity.y = (body.velocity.y - config.gravity * dt).max(-config.terminal_velocity);
    }

    let start = body.position;
    let mut delta = body.velocity * dt;
    let guard = body.sneaking && body.grounded && !body.flight;

    if guard && (delta.x != 0.0 || delta.z != 0.0) && !has_support(grid, start + delta, config) {
        delta.x = 0.0;
        delta.z = 0.0;
        report.ledge_stopped = true;
    }

    let was_grounded = body.grounded;
    body.grounded = false;
    let mut pos = start;

    // X
    if delta.x != 0.0 {
        let next = pos + Vec3::new(delta.x, 0.0, 0.0);
        if collides(grid, next, config) {
            report.blocked_x = true;
        } else if guard && !collides(grid, next - Vec3::Y * config.ground_probe, config) {
            report.ledge_stopped = true;
        } else {
            pos = next;
        }
    }

    // Y
    if delta.y != 0.0 {
        let next = pos + Vec3::new(0.0, delta.y, 0.0);
        if collides(grid, next, config) {
            report.blocked_y = true;
            pos = settle(grid, pos, next, config);
            if body.velocity.y < 0.0 && !body.flight {
                body.grounded = true;
                body.jump_lock = false;
            }
            body.velocity.y = 0.0;
        } else {
            pos = next;
        }
    }

    // Z
    if delta.z != 0.0 {
        let next = pos + Vec3::new(0.0, 0.0, delta.z);
        if collides(grid, next, config) {
            report.blocked_z = true;
        } else if guard && !collides(grid, next - Vec3::Y * config.ground_probe, config) {
            report.ledge_stopped = true;
        } else {
            pos = next;
        }
    }

    body.position = pos;

    if !body.flight
        && body.velocity.y <= 0.0
        && collides(grid, pos - Vec3::Y * config.ground_probe, config)
    {
        body.grounded = true;
        body.velocity.y = 0.0;
        body.jump_lock = false;
    }

    report.landed = body.grounded && !was_grounded;
    report
}

/// Moves from the free position `from` toward the blocked `to` as far as the
/// shape allows.
fn settle(grid: &dyn VoxelRead, from: Vec3, to: Vec3, config: &PhysicsConfig) -> Vec3 {
    let (mut free, mut blocked) = (from, to);
    for _ in 0..SETTLE_ITERATIONS {
        let mid = (free + blocked) * 0.5;
        if collides(grid, mid, config) {
            blocked = mid;
        } else {
            free = mid;
        }
    }
    free
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strata_voxel::{BoundedGrid, ChunkExtent, VoxelKind};

    use super::*;

    /// 32 × 16 × 32 box with a stone floor whose top face is at y = 4.
    fn floor_grid() -> BoundedGrid {
        let mut grid =
            BoundedGrid::new(IVec3::new(-16, 0, -16), ChunkExtent::new(32, 16, 32).unwrap()).unwrap();
        grid.fill_box(IVec3::new(-16, 0, -16), IVec3::new(15, 3, 15), VoxelKind::Stone);
        grid
    }

    fn drop_until_rest(shape: CollisionShape) -> MovingBody {
        let grid = floor_grid();
        let config = PhysicsConfig {
            shape,
            ..Default::default()
        };
        let mut body = MovingBody::new(Vec3::new(0.5, 10.0, 0.5));
        for _ in 0..240 {
            step_collision(&mut body, &grid, &config, 1.0 / 60.0);
        }
        body
    }

    #[test]
    fn test_box_drop_comes_to_rest_on_floor() {
        let body = drop_until_rest(CollisionShape::Box);
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.position.y - 4.0).abs() < 0.01, "y = {}", body.position.y);
    }

    #[test]
    fn test_capsule_drop_comes_to_rest_on_floor() {
        let body = drop_until_rest(CollisionShape::Capsule);
        assert!(body.grounded);
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.position.y - 4.0).abs() < 0.01, "y = {}", body.position.y);
    }

    #[test]
    fn test_rest_position_is_stable() {
        let grid = floor_grid();
        let config = PhysicsConfig::default();
        let mut body = drop_until_rest(CollisionShape::Box);
        let y = body.position.y;
        for _ in 0..60 {
            step_collision(&mut body, &grid, &config, 1.0 / 60.0);
            assert!(body.grounded);
        }
        assert!((body.position.y - y).abs() < 1e-4);
    }

    #[test]
    fn test_terminal_velocity_clamps_fall() {
        let grid = BoundedGrid::new(IVec3::ZERO, ChunkExtent::new(1, 1, 1).unwrap()).unwrap();
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(0.5, 5000.0, 0.5));
        for _ in 0..600 {
            step_collision(&mut body, &grid, &config, 1.0 / 60.0);
        }
        assert_eq!(body.velocity.y, -config.terminal_velocity);
        assert!(!body.grounded);
    }

    #[test]
    fn test_wall_blocks_x_but_allows_z_slide() {
        let mut grid = floor_grid();
        grid.fill_box(IVec3::new(2, 4, -16), IVec3::new(2, 8, 15), VoxelKind::Stone);
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(1.5, 4.0, 0.5));
        body.grounded = true;
        body.velocity = Vec3::new(3.0, 0.0, 3.0);
        let report = step_collision(&mut body, &grid, &config, 0.1);
        assert!(report.blocked_x);
        assert!(!report.blocked_z);
        assert_eq!(body.position.x, 1.5);
        assert!((body.position.z - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_landing_releases_jump_lock() {
        let grid = floor_grid();
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(0.5, 4.5, 0.5));
        body.jump_lock = true;
        let mut landed = false;
        for _ in 0..30 {
            landed |= step_collision(&mut body, &grid, &config, 1.0 / 60.0).landed;
        }
        assert!(landed);
        assert!(!body.jump_lock);
    }

    #[test]
    fn test_ledge_guard_stops_sneaking_body_at_edge() {
        let mut grid =
            BoundedGrid::new(IVec3::new(-16, 0, -16), ChunkExtent::new(32, 16, 32).unwrap()).unwrap();
        // Platform covering x in [-16, 1).
        grid.fill_box(IVec3::new(-16, 0, -16), IVec3::new(0, 3, 15), VoxelKind::Stone);
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(0.5, 4.0, 0.5));
        body.grounded = true;
        body.sneaking = true;
        for _ in 0..120 {
            body.velocity.x = 2.0;
            step_collision(&mut body, &grid, &config, 1.0 / 60.0);
        }
        assert!(body.grounded);
        assert!(body.position.x < 1.0 + config.box_width * 0.5);
        assert!((body.position.y - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_without_sneak_body_walks_off_edge() {
        let mut grid =
            BoundedGrid::new(IVec3::new(-16, 0, -16), ChunkExtent::new(32, 16, 32).unwrap()).unwrap();
        grid.fill_box(IVec3::new(-16, 0, -16), IVec3::new(0, 3, 15), VoxelKind::Stone);
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(0.5, 4.0, 0.5));
        body.grounded = true;
        for _ in 0..60 {
            body.velocity.x = 2.0;
            step_collision(&mut body, &grid, &config, 1.0 / 60.0);
        }
        assert!(body.position.y < 4.0);
    }

    #[test]
    fn test_noclip_passes_through_solid() {
        let grid = floor_grid();
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(0.5, 5.0, 0.5));
        body.noclip = true;
        body.velocity = Vec3::new(0.0, -10.0, 0.0);
        step_collision(&mut body, &grid, &config, 0.3);
        assert!((body.position.y - 2.0).abs() < 1e-5);
        assert!(!body.grounded);
    }

    #[test]
    fn test_flight_ignores_gravity() {
        let grid = floor_grid();
        let config = PhysicsConfig::default();
        let mut body = MovingBody::new(Vec3::new(0.5, 8.0, 0.5));
        body.flight = true;
        for _ in 0..60 {
            step_collision(&mut body, &grid, &config, 1.0 / 60.0);
        }
        assert_eq!(body.position.y, 8.0);
        assert!(!body.grounded);
    }

    #[test]
    fn test_box_catches_on_corner_capsule_slides() {
        // A lone pillar whose corner sits just inside the box footprint but
        // outside the capsule's rounded side.
        let mut grid = floor_grid();
        grid.fill_box(IVec3::new(1, 4, 1), IVec3::new(1, 8, 1), VoxelKind::Stone);
        let feet = Vec3::new(0.74, 4.01, 0.74);

        let boxed = PhysicsConfig::default();
        assert!(collides(&grid, feet, &boxed));

        let capsule = PhysicsConfig {
            shape: CollisionShape::Capsule,
            ..Default::default()
        };
        assert!(!collides(&grid, feet, &capsule));
    }
}
