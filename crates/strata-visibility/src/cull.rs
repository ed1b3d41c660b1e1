//! The culling pipeline: chunk, block and face stages, then lighting.

use glam::{IVec3, Vec3};
use strata_voxel::{ColorTable, Region, Rgba, VoxelKind, VoxelRead};

use crate::config::RenderConfig;
use crate::face::Face;
use crate::frustum::ViewFrustum;
use crate::lighting::face_brightness;

/// One face the renderer should draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawableFace {
    pub block: IVec3,
    pub kind: VoxelKind,
    pub face: Face,
    /// Lighting factor in `[min_brightness, 1]`.
    pub brightness: f32,
    /// Base colour of `kind` scaled by `brightness`.
    pub color: Rgba,
}

/// Counters from one culling pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CullStats {
    pub regions_considered: usize,
    pub regions_culled: usize,
    /// Non-empty voxels in surviving regions.
    pub blocks_considered: usize,
    pub blocks_out_of_range: usize,
    pub blocks_occluded: usize,
    pub blocks_outside_fov: usize,
    /// Voxels that passed every block stage.
    pub blocks_drawn: usize,
    pub faces_emitted: usize,
}

/// Returns `true` if every face-adjacent cell of `pos` is non-empty.
pub fn is_occluded(grid: &dyn VoxelRead, pos: IVec3) -> bool {
    Face::ALL
        .iter()
        .all(|f| grid.get_voxel(pos + f.offset()) != VoxelKind::Empty)
}

/// Chunk stage: distance to the region centre and the cone test.
pub fn region_visible(region: &Region, frustum: &ViewFrustum, config: &RenderConfig) -> bool {
    let center = region.center();
    let radius = region.bounding_radius();
    let dist = center.distance(frustum.position);
    if dist > frustum.render_distance + radius {
        return false;
    }
    if dist <= config.near_chunk_radius {
        return true;
    }
    frustum.sphere_in_cone(center, radius)
}

/// Block stage for a non-empty voxel at `pos`.
fn block_stage(
    grid: &dyn VoxelRead,
    pos: IVec3,
    frustum: &ViewFrustum,
    config: &RenderConfig,
    stats: &mut CullStats,
) -> bool {
    let center = pos.as_vec3() + Vec3::splat(0.5);
    let dist_sq = center.distance_squared(frustum.position);
    if dist_sq > frustum.render_distance * frustum.render_distance {
        stats.blocks_out_of_range += 1;
        return false;
    }
    if is_occluded(grid, pos) {
        stats.blocks_occluded += 1;
        return false;
    }
    if dist_sq >= config.near_block_radius * config.near_block_radius
        && !frustum.block_in_fov(center, dist_sq.sqrt())
    {
        stats.blocks_outside_fov += 1;
        return false;
    }
    true
}

/// Culls `regions` against `frustum` and appends every visible, lit face to `out`.
///
/// `out` is not cleared, so callers can reuse one buffer across ticks by
/// clearing it themselves. Regions are expected to be fully generated; a
/// region whose chunk is absent simply contributes no faces.
pub fn cull_and_light(
    grid: &dyn VoxelRead,
    regions: &[Region],
    frustum: &ViewFrustum,
    colors: &ColorTable,
    config: &RenderConfig,
    out: &mut Vec<DrawableFace>,
) -> CullStats {
    let mut stats = CullStats::default();
    for region in regions {
        stats.regions_considered += 1;
        if !region_visible(region, frustum, config) {
            stats.regions_culled += 1;
            continue;
        }
        for pos in region.cells() {
            let kind = grid.get_voxel(pos);
            if kind == VoxelKind::Empty {
                continue;
            }
            stats.blocks_considered += 1;
            if !block_stage(grid, pos, frustum, config, &mut stats) {
                continue;
            }
            stats.blocks_drawn += 1;

            let center = pos.as_vec3() + Vec3::splat(0.5);
            let to_camera = frustum.position - center;
            let base = colors.color(kind);
            for face in Face::ALL {
                if to_camera.dot(face.normal()) <= 0.0 {
                    continue;
                }
                let neighbour = pos + face.offset();
                if grid.get_voxel(neighbour) != VoxelKind::Empty {
                    continue;
                }
                let brightness = face_brightness(grid, face, neighbour, config);
                out.push(DrawableFace {
                    block: pos,
                    kind,
                    face,
                    brightness,
                    color: base.scaled(brightness),
                });
                stats.faces_emitted += 1;
            }
        }
    }
    tracing::trace!(
        "culled {}/{} regions, {} blocks drawn, {} faces",
        stats.regions_culled,
        stats.regions_considered,
        stats.blocks_drawn,
        stats.faces_emitted
    );
    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
