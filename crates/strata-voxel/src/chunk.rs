//! Dense voxel storage for one chunk.
//!
//! A [`Chunk`] is a flat, y-major array of [`Voxel`]s sized by its
//! [`ChunkExtent`], plus lifecycle flags. The voxel buffer is allocated
//! fallibly so that running out of memory surfaces as a
//! [`VoxelError::Allocation`] instead of aborting the process.

use glam::IVec3;

use crate::addressing::{ChunkCoord, ChunkExtent, chunk_origin};
use crate::error::VoxelError;
use crate::kind::{Voxel, VoxelKind};

/// A fixed-size block of voxels at a chunk coordinate.
#[derive(Clone, Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    extent: ChunkExtent,
    voxels: Box<[Voxel]>,
    /// Set while the chunk is held by a [`ChunkStore`](crate::ChunkStore).
    resident: bool,
    /// Contents were produced (from disk or procedurally). Never reverts.
    generated: bool,
    /// Edited since it was generated or last saved.
    modified: bool,
    /// Incremented on every voxel write.
    version: u64,
}

impl Chunk {
    /// Creates an all-empty, not-yet-generated chunk.
    pub fn new(coord: ChunkCoord, extent: ChunkExtent) -> Result<Self, VoxelError> {
        let volume = extent.volume();
        let mut voxels = Vec::new();
        voxels
            .try_reserve_exact(volume)
            .map_err(|_| VoxelError::Allocation { voxels: volume })?;
        voxels.resize(volume, Voxel::EMPTY);
        Ok(Self {
            coord,
            extent,
            voxels: voxels.into_boxed_slice(),
            resident: false,
            generated: false,
            modified: false,
            version: 0,
        })
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn extent(&self) -> ChunkExtent {
        self.extent
    }

    /// World coordinate of local `(0, 0, 0)`.
    pub fn origin(&self) -> IVec3 {
        chunk_origin(self.coord, self.extent)
    }

    /// Returns the kind at a local coordinate, or `Empty` if it is out of range.
    pub fn get(&self, local: IVec3) -> VoxelKind {
        match self.extent.linear_index(local) {
            Some(i) => self.voxels[i].kind(),
            None => {
                tracing::warn!("Chunk::get out of bounds: {local}");
                VoxelKind::Empty
            }
        }
    }

    /// Writes a local cell. Out-of-range writes are ignored with a warning.
    ///
    /// Marks the chunk as modified.
    pub fn set(&mut self, local: IVec3, kind: VoxelKind) {
        let Some(i) = self.extent.linear_index(local) else {
            tracing::warn!("Chunk::set out of bounds: {local}");
            return;
        };
        self.voxels[i] = Voxel::new(kind);
        self.modified = true;
        self.version += 1;
    }

    /// Replaces the whole contents and marks the chunk as generated.
    ///
    /// `fill` receives each local coordinate in storage order. The chunk is
    /// left unmodified: freshly generated contents can always be reproduced.
    pub fn generate_with(&mut self, mut fill: impl FnMut(IVec3) -> VoxelKind) {
        for i in 0..self.voxels.len() {
            let local = self.extent.local_from_index(i);
            self.voxels[i] = Voxel::new(fill(local));
        }
        self.generated = true;
        self.modified = false;
        self.version += 1;
    }

    /// Read-only view of the voxels in storage order (y-major, then z, then x).
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Number of non-empty voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.kind().is_solid()).count()
    }

    pub fn is_resident(&self) -> bool {
        self.resident
    }

    pub(crate) fn set_resident(&mut self, resident: bool) {
        self.resident = resident;
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Marks the contents as produced. Once set this flag is never cleared.
    pub fn mark_generated(&mut self) {
        self.generated = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag, e.g. after the chunk was saved.
    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> ChunkExtent {
        ChunkExtent::new(4, 8, 4).unwrap()
    }

    #[test]
    fn test_new_chunk_is_empty_and_not_generated() {
        let chunk = Chunk::new(ChunkCoord::new(1, 2, 3), small()).unwrap();
        assert_eq!(chunk.voxels().len(), 4 * 8 * 4);
        assert!(chunk.voxels().iter().all(|v| v.kind() == VoxelKind::Empty));
        assert!(!chunk.is_generated());
        assert!(!chunk.is_resident());
        assert!(!chunk.is_modified());
        assert_eq!(chunk.origin(), IVec3::new(4, 16, 12));
    }

    #[test]
    fn test_set_then_get() {
        let mut chunk = Chunk::new(ChunkCoord::default(), small()).unwrap();
        chunk.set(IVec3::new(3, 7, 0), VoxelKind::Wood);
        assert_eq!(chunk.get(IVec3::new(3, 7, 0)), VoxelKind::Wood);
        assert_eq!(chunk.get(IVec3::new(0, 0, 0)), VoxelKind::Empty);
        assert!(chunk.is_modified());
        assert_eq!(chunk.version(), 1);
    }

    #[test]
    fn test_out_of_bounds_access_is_graceful() {
        let mut chunk = Chunk::new(ChunkCoord::default(), small()).unwrap();
        chunk.set(IVec3::new(4, 0, 0), VoxelKind::Stone);
        assert!(!chunk.is_modified());
        assert_eq!(chunk.get(IVec3::new(-1, 0, 0)), VoxelKind::Empty);
    }

    #[test]
    fn test_generate_with_marks_generated_and_clean() {
        let mut chunk = Chunk::new(ChunkCoord::default(), small()).unwrap();
        chunk.set(IVec3::ZERO, VoxelKind::Sand);
        chunk.generate_with(|local| {
            if local.y < 2 {
                VoxelKind::Stone
            } else {
                VoxelKind::Empty
            }
        });
        assert!(chunk.is_generated());
        assert!(!chunk.is_modified());
        assert_eq!(chunk.get(IVec3::new(2, 1, 3)), VoxelKind::Stone);
        assert_eq!(chunk.get(IVec3::new(2, 2, 3)), VoxelKind::Empty);
        assert_eq!(chunk.solid_count(), 4 * 2 * 4);
    }

    #[test]
    fn test_generated_flag_survives_edits() {
        let mut chunk = Chunk::new(ChunkCoord::default(), small()).unwrap();
        chunk.mark_generated();
        chunk.set(IVec3::ONE, VoxelKind::Dirt);
        chunk.clear_modified();
        assert!(chunk.is_generated());
    }
}
