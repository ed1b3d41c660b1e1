//! Fixed-step ray march through the voxel field.
//!
//! Used for break/place interaction and the highlighted block. The ray is
//! sampled every `step` units from the eye; each sample is floored to a voxel
//! coordinate and queried. Thin diagonal contacts narrower than `step` can be
//! skipped, which is acceptable at interaction range.

use glam::{IVec3, Vec3};
use strata_voxel::{VoxelKind, VoxelRead};

/// Default interaction reach, in blocks.
pub const DEFAULT_REACH: f32 = 10.0;

/// Default sampling interval along the ray.
pub const DEFAULT_RAY_STEP: f32 = 0.05;

/// Upper bound on samples per ray. Smaller steps are widened to fit.
pub const MAX_RAY_SAMPLES: u32 = 1 << 16;

/// Result of a ray march that found a non-empty voxel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    /// The first non-empty cell along the ray.
    pub block: IVec3,
    /// Cell of the sample just before the hit; the placement target.
    pub adjacent: IVec3,
    pub kind: VoxelKind,
    /// Distance from the eye to the hitting sample.
    pub distance: f32,
}

/// Marches from `eye` along `dir` until a non-empty voxel or `max_distance`.
///
/// Returns `None` on a miss, a zero direction, a non-positive or infinite step,
/// or an unbounded distance. A step too small to cover `max_distance` within
/// [`MAX_RAY_SAMPLES`] samples is widened. When the eye itself sits inside a
/// solid voxel that voxel is the hit and also its own adjacent cell.
pub fn raycast(
    grid: &dyn VoxelRead,
    eye: Vec3,
    dir: Vec3,
    max_distance: f32,
    step: f32,
) -> Option<RaycastHit> {
    let dir = dir.try_normalize()?;
    if !step.is_finite() || step <= 0.0 || !max_distance.is_finite() {
        return None;
    }

    let step = step.max(max_distance / MAX_RAY_SAMPLES as f32);
    // Saturating cast: a non-positive distance gives zero samples.
    let samples = ((max_distance / step).ceil() as u32).min(MAX_RAY_SAMPLES);

    let mut previous = eye.floor().as_ivec3();
    for i in 0..samples {
        let distance = i as f32 * step;
        if distance >= max_distance {
            break;
        }
        let cell = (eye + dir * distance).floor().as_ivec3();
        let kind = grid.get_voxel(cell);
        if kind != VoxelKind::Empty {
            return Some(RaycastHit {
                block: cell,
                adjacent: previous,
                kind,
                distance,
            });
        }
        previous = cell;
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use strata_voxel::{ChunkExtent, ChunkStore, VoxelWrite};

    fn grid_with(cells: &[(IVec3, VoxelKind)]) -> ChunkStore {
        let mut store = ChunkStore::new(ChunkExtent::DEFAULT);
        for &(pos, kind) in cells {
            store.set_voxel(pos, kind).unwrap();
        }
        store
    }

    #[test]
    fn test_hits_isolated_voxel_with_adjacent_before_it() {
        let grid = grid_with(&[(IVec3::new(5, 2, 0), VoxelKind::Wood)]);
        let hit = raycast(&grid, Vec3::new(0.5, 2.5, 0.5), Vec3::X, 10.0, 0.05).unwrap();
        assert_eq!(hit.block, IVec3::new(5, 2, 0));
        assert_eq!(hit.adjacent, IVec3::new(4, 2, 0));
        assert_eq!(hit.kind, VoxelKind::Wood);
        assert!((hit.distance - 4.5).abs() < 0.06);
    }

    #[test]
    fn test_miss_beyond_reach() {
        let grid = grid_with(&[(IVec3::new(20, 0, 0), VoxelKind::Stone)]);
        assert!(raycast(&grid, Vec3::new(0.5, 0.5, 0.5), Vec3::X, 10.0, 0.05).is_none());
    }

    #[test]
    fn test_direction_is_normalized() {
        let grid = grid_with(&[(IVec3::new(0, -3, 0), VoxelKind::Stone)]);
        let hit = raycast(&grid, Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.0, -7.0, 0.0), 10.0, 0.05)
            .unwrap();
        assert_eq!(hit.block, IVec3::new(0, -3, 0));
        assert_eq!(hit.adjacent, IVec3::new(0, -2, 0));
    }

    #[test]
    fn test_degenerate_input_misses() {
        let grid = grid_with(&[(IVec3::ZERO, VoxelKind::Stone)]);
        let eye = Vec3::new(0.5, 0.5, 0.5);
        assert!(raycast(&grid, eye, Vec3::ZERO, 10.0, 0.05).is_none());
        assert!(raycast(&grid, eye, Vec3::X, 10.0, 0.0).is_none());
    }

    #[test]
    fn test_tiny_step_is_bounded() {
        let grid = grid_with(&[(IVec3::new(3, 0, 0), VoxelKind::Stone)]);
        let eye = Vec3::new(0.5, 0.5, 0.5);
        let hit = raycast(&grid, eye, Vec3::X, 5.0, 1e-9).unwrap();
        assert_eq!(hit.block, IVec3::new(3, 0, 0));
        assert_eq!(hit.adjacent, IVec3::new(2, 0, 0));
        assert!(hit.distance < 2.6);
        assert!(raycast(&grid, eye, Vec3::NEG_X, 5.0, 1e-9).is_none());
        assert!(raycast(&grid, eye, Vec3::X, -1.0, 0.05).is_none());
    }

    #[test]
    fn test_eye_inside_solid_hits_itself() {
        let grid = grid_with(&[(IVec3::ZERO, VoxelKind::Dirt)]);
        let hit = raycast(&grid, Vec3::new(0.5, 0.5, 0.5), Vec3::X, 10.0, 0.05).unwrap();
        assert_eq!(hit.block, IVec3::ZERO);
        assert_eq!(hit.adjacent, IVec3::ZERO);
        assert_eq!(hit.distance, 0.0);
    }
}
