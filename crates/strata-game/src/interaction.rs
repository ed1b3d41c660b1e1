//! Breaking and placing voxels at the ray-march hit.

use glam::{IVec3, Vec3};
use strata_physics::{MovingBody, PhysicsConfig, RaycastHit};
use strata_voxel::{VoxelKind, VoxelWrite};

/// Edits made by one tick's interaction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    /// Cell cleared by a break, with the kind it held.
    pub broken: Option<(IVec3, VoxelKind)>,
    /// Cell filled by a place.
    pub placed: Option<IVec3>,
}

/// Clears the hit cell.
pub fn break_block<W>(grid: &mut W, hit: &RaycastHit) -> Result<(IVec3, VoxelKind), W::Error>
where
    W: VoxelWrite + ?Sized,
{
    grid.set_voxel(hit.block, VoxelKind::Empty)?;
    tracing::debug!("broke {:?} at {}", hit.kind, hit.block);
    Ok((hit.block, hit.kind))
}

/// Writes the body's selected kind into the hit's adjacent cell.
///
/// Nothing happens (and `Ok(None)` is returned) if the selection is `Empty`,
/// the adjacent cell is occupied, or the new block would overlap the body.
pub fn place_block<W>(
    grid: &mut W,
    hit: &RaycastHit,
    body: &MovingBody,
    physics: &PhysicsConfig,
) -> Result<Option<IVec3>, W::Error>
where
    W: VoxelWrite + ?Sized,
{
    let cell = hit.adjacent;
    if body.selected == VoxelKind::Empty || grid.get_voxel(cell) != VoxelKind::Empty {
        return Ok(None);
    }
    if cell_overlaps_body(cell, body, physics) {
        tracing::trace!("refused to place at {cell}: overlaps body");
        return Ok(None);
    }
    grid.set_voxel(cell, body.selected)?;
    tracing::debug!("placed {:?} at {cell}", body.selected);
    Ok(Some(cell))
}

/// Returns `true` if the unit cell intersects the body's bounds.
pub fn cell_overlaps_body(cell: IVec3, body: &MovingBody, physics: &PhysicsConfig) -> bool {
    let (min, max) = body.bounds(physics);
    let cmin = cell.as_vec3();
    let cmax = cmin + Vec3::ONE;
    min.x < cmax.x
        && max.x > cmin.x
        && min.y < cmax.y
        && max.y > cmin.y
        && min.z < cmax.z
        && max.z > cmin.z
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
