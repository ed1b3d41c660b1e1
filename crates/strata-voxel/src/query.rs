//! Point queries over the voxel field.
//!
//! Physics, ray marching and culling only ever read voxels through
//! [`VoxelRead`], so they work the same against the infinite chunked world
//! and the fixed-bounds [`BoundedGrid`](crate::BoundedGrid). Which addressing
//! strategy is in play is decided by the caller picking an implementor; the
//! two are never mixed behind one value.

use glam::IVec3;

use crate::addressing::{ChunkExtent, chunk_origin, split};
use crate::chunk_store::ChunkStore;
use crate::error::VoxelError;
use crate::kind::VoxelKind;

/// Read access to a voxel field by world coordinate.
pub trait VoxelRead {
    /// Returns the kind at `pos`. Cells that are not resident read as `Empty`.
    fn get_voxel(&self, pos: IVec3) -> VoxelKind;

    /// Shorthand for `get_voxel(pos).is_solid()`.
    fn is_solid(&self, pos: IVec3) -> bool {
        self.get_voxel(pos).is_solid()
    }
}

/// Write access to a voxel field by world coordinate.
pub trait VoxelWrite: VoxelRead {
    type Error;

    /// Writes `kind` at `pos`.
    ///
    /// Fails only when the owning storage cannot be made resident.
    fn set_voxel(&mut self, pos: IVec3, kind: VoxelKind) -> Result<(), Self::Error>;
}

/// An axis-aligned box of voxels that culling walks over, usually one chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// World coordinate of the minimum corner.
    pub origin: IVec3,
    /// Number of voxels along each axis.
    pub size: IVec3,
}

impl Region {
    pub fn new(origin: IVec3, size: IVec3) -> Self {
        Self { origin, size }
    }

    /// Region covered by a chunk.
    pub fn of_chunk(coord: crate::ChunkCoord, extent: ChunkExtent) -> Self {
        Self::new(chunk_origin(coord, extent), extent.as_ivec3())
    }

    /// Geometric centre in world space.
    pub fn center(&self) -> glam::Vec3 {
        self.origin.as_vec3() + self.size.as_vec3() * 0.5
    }

    /// Half of the box diagonal.
    pub fn bounding_radius(&self) -> f32 {
        self.size.as_vec3().length() * 0.5
    }

    /// Iterates over every voxel coordinate in the region, y-major.
    pub fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        let o = self.origin;
        let s = self.size.max(IVec3::ZERO);
        (0..s.y).flat_map(move |y| {
            (0..s.z).flat_map(move |z| (0..s.x).map(move |x| o + IVec3::new(x, y, z)))
        })
    }
}

/// Raw infinite addressing: never creates chunks, absent chunks read as `Empty`.
impl VoxelRead for ChunkStore {
    fn get_voxel(&self, pos: IVec3) -> VoxelKind {
        let (coord, local) = split(pos, self.extent());
        self.find(coord)
            .map_or(VoxelKind::Empty, |chunk| chunk.get(local))
    }
}

/// Writes create the owning chunk on demand. The chunk is left un-generated;
/// callers that want terrain underneath an edit must fill it first.
impl VoxelWrite for ChunkStore {
    type Error = VoxelError;

    fn set_voxel(&mut self, pos: IVec3, kind: VoxelKind) -> Result<(), VoxelError> {
        let (coord, local) = split(pos, self.extent());
        self.insert(coord)?.set(local, kind);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChunkCoord;

    #[test]
    fn test_unwritten_voxel_reads_empty() {
        let store = ChunkStore::new(ChunkExtent::DEFAULT);
        assert_eq!(store.get_voxel(IVec3::new(5, 5, 5)), VoxelKind::Empty);
        assert_eq!(store.get_voxel(IVec3::new(-900, 3, 12345)), VoxelKind::Empty);
        assert!(store.is_empty());
    }

    #[test]
    fn test_negative_write_lands_in_negative_chunk() {
        let mut store = ChunkStore::new(ChunkExtent::DEFAULT);
        store
            .set_voxel(IVec3::new(-1, 0, -1), VoxelKind::Stone)
            .unwrap();
        let chunk = store.find(ChunkCoord::new(-1, 0, -1)).expect("created on write");
        assert_eq!(chunk.get(IVec3::new(31, 0, 31)), VoxelKind::Stone);
        assert_eq!(store.get_voxel(IVec3::new(-1, 0, -1)), VoxelKind::Stone);
    }

    #[test]
    fn test_set_then_get_every_kind() {
        let mut store = ChunkStore::new(ChunkExtent::new(8, 8, 8).unwrap());
        for (i, kind) in VoxelKind::ALL.into_iter().enumerate() {
            let i = i as i32;
            let pos = IVec3::new(-3 * i - 1, 5 * i - 17, 11 * i);
            store.set_voxel(pos, kind).unwrap();
            assert_eq!(store.get_voxel(pos), kind);
        }
    }

    #[test]
    fn test_region_cells_cover_volume() {
        let region = Region::new(IVec3::new(-2, 0, 4), IVec3::new(2, 3, 4));
        let cells: Vec<_> = region.cells().collect();
        assert_eq!(cells.len(), 24);
        assert_eq!(cells[0], IVec3::new(-2, 0, 4));
        assert_eq!(*cells.last().unwrap(), IVec3::new(-1, 2, 7));
        assert_eq!(region.center(), glam::Vec3::new(-1.0, 1.5, 6.0));
    }
}
