//! Fixed-bounds voxel grid.
//!
//! The legacy non-infinite world: one dense box positioned at a world-space
//! minimum corner. Reads outside the box return `Empty` and writes outside it
//! are dropped, so callers see the same "infinite" contract as the chunked
//! world without any chunk machinery.

use glam::IVec3;

use crate::addressing::ChunkExtent;
use crate::error::VoxelError;
use crate::kind::{Voxel, VoxelKind};
use crate::query::{Region, VoxelRead, VoxelWrite};

/// A dense, fixed-size voxel box.
#[derive(Clone, Debug)]
pub struct BoundedGrid {
    min: IVec3,
    size: ChunkExtent,
    voxels: Box<[Voxel]>,
}

impl BoundedGrid {
    /// 100 × 50 × 100 voxels, centred on the origin in X and Z.
    pub fn legacy() -> Result<Self, VoxelError> {
        let size = ChunkExtent::new(100, 50, 100)?;
        Self::new(IVec3::new(-50, 0, -50), size)
    }

    /// Creates an all-empty grid covering `[min, min + size)`.
    pub fn new(min: IVec3, size: ChunkExtent) -> Result<Self, VoxelError> {
        let volume = size.volume();
        let mut voxels = Vec::new();
        voxels
            .try_reserve_exact(volume)
            .map_err(|_| VoxelError::Allocation { voxels: volume })?;
        voxels.resize(volume, Voxel::EMPTY);
        Ok(Self {
            min,
            size,
            voxels: voxels.into_boxed_slice(),
        })
    }

    /// Minimum corner in world coordinates.
    pub fn min(&self) -> IVec3 {
        self.min
    }

    /// Number of voxels along each axis.
    pub fn size(&self) -> ChunkExtent {
        self.size
    }

    /// Returns `true` if `pos` lies inside the box.
    pub fn contains(&self, pos: IVec3) -> bool {
        self.local(pos)
            .is_some_and(|local| self.size.contains_local(local))
    }

    /// Fills the inclusive box `[from, to]` with `kind`, clipped to the grid.
    pub fn fill_box(&mut self, from: IVec3, to: IVec3, kind: VoxelKind) {
        let lo = from.min(to).max(self.min);
        let last = self.size.as_ivec3() - IVec3::ONE;
        let max = IVec3::new(
            self.min.x.saturating_add(last.x),
            self.min.y.saturating_add(last.y),
            self.min.z.saturating_add(last.z),
        );
        let hi = from.max(to).min(max);
        for y in lo.y..=hi.y {
            for z in lo.z..=hi.z {
                for x in lo.x..=hi.x {
                    self.write(IVec3::new(x, y, z), kind);
                }
            }
        }
    }

    /// The whole grid as a single culling region.
    pub fn regions(&self) -> Vec<Region> {
        vec![Region::new(self.min, self.size.as_ivec3())]
    }

    /// Offset of `pos` from the minimum corner, `None` if it does not fit in `i32`.
    fn local(&self, pos: IVec3) -> Option<IVec3> {
        Some(IVec3::new(
            pos.x.checked_sub(self.min.x)?,
            pos.y.checked_sub(self.min.y)?,
            pos.z.checked_sub(self.min.z)?,
        ))
    }

    fn index(&self, pos: IVec3) -> Option<usize> {
        self.size.linear_index(self.local(pos)?)
    }

    fn write(&mut self, pos: IVec3, kind: VoxelKind) {
        if let Some(i) = self.index(pos) {
            self.voxels[i] = Voxel::new(kind);
        }
    }
}

impl VoxelRead for BoundedGrid {
    fn get_voxel(&self, pos: IVec3) -> VoxelKind {
        self.index(pos)
            .map_or(VoxelKind::Empty, |i| self.voxels[i].kind())
    }
}

/// Out-of-range writes are silently ignored and still report success.
impl VoxelWrite for BoundedGrid {
    type Error = VoxelError;

    fn set_voxel(&mut self, pos: IVec3, kind: VoxelKind) -> Result<(), VoxelError> {
        self.write(pos, kind);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
