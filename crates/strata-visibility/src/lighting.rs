//! Approximate sky lighting.
//!
//! No light is stored or propagated. A face is as bright as its orientation
//! allows, scaled down when something sits a few cells above the open cell in
//! front of it.

use glam::IVec3;
use strata_voxel::{VoxelKind, VoxelRead};

use crate::config::RenderConfig;
use crate::face::Face;

/// Sky exposure of `cell`: `lit` if the `sky_scan` cells directly above are
/// all empty, otherwise `shadowed`.
pub fn sky_exposure(grid: &dyn VoxelRead, cell: IVec3, config: &RenderConfig) -> f32 {
    let scan = i32::try_from(config.sky_scan).unwrap_or(i32::MAX);
    let covered = (1..=scan)
        .map(|dy| cell.saturating_add(IVec3::new(0, dy, 0)))
        .any(|above| grid.get_voxel(above) != VoxelKind::Empty);
    if covered {
        config.shadowed
    } else {
        config.lit
    }
}

/// Per-orientation multiplier: top brightest, bottom darkest.
pub fn face_multiplier(face: Face, config: &RenderConfig) -> f32 {
    if face.is_top() {
        config.top_face
    } else if face.is_bottom() {
        config.bottom_face
    } else {
        config.side_face
    }
}

/// Final brightness of `face`, whose open neighbour is `neighbour`.
pub fn face_brightness(
    grid: &dyn VoxelRead,
    face: Face,
    neighbour: IVec3,
    config: &RenderConfig,
) -> f32 {
    let floor = config.min_brightness.clamp(0.0, 1.0);
    (face_multiplier(face, config) * sky_exposure(grid, neighbour, config)).clamp(floor, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
