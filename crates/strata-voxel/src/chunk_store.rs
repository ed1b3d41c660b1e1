//! Central owner for all resident chunks, keyed by [`ChunkCoord`].
//!
//! The [`ChunkStore`] provides O(1) chunk lookup, insert, and removal
//! using an [`FxHashMap`](rustc_hash::FxHashMap) for fast hashing of
//! small fixed-size keys. Removing one chunk never disturbs the others.

use rustc_hash::FxHashMap;

use crate::addressing::{ChunkCoord, ChunkExtent};
use crate::chunk::Chunk;
use crate::error::VoxelError;

/// Owns every resident chunk. At most one chunk exists per coordinate.
#[derive(Debug)]
pub struct ChunkStore {
    extent: ChunkExtent,
    chunks: FxHashMap<ChunkCoord, Chunk>,
}

impl ChunkStore {
    /// Creates an empty store whose chunks all share `extent`.
    pub fn new(extent: ChunkExtent) -> Self {
        Self {
            extent,
            chunks: FxHashMap::default(),
        }
    }

    /// Extent shared by every chunk in the store.
    pub fn extent(&self) -> ChunkExtent {
        self.extent
    }

    /// Immutable access to a resident chunk.
    pub fn find(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mutable access to a resident chunk.
    pub fn find_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// Returns the chunk at `coord`, creating an empty, non-generated one if absent.
    ///
    /// Fails without touching the store if the new chunk cannot be allocated.
    pub fn insert(&mut self, coord: ChunkCoord) -> Result<&mut Chunk, VoxelError> {
        if !self.chunks.contains_key(&coord) {
            let mut chunk = Chunk::new(coord, self.extent)?;
            self.chunks.try_reserve(1).map_err(|_| VoxelError::Allocation {
                voxels: self.extent.volume(),
            })?;
            chunk.set_resident(true);
            self.chunks.insert(coord, chunk);
        }
        // Present: either it was already resident or it was just inserted.
        self.chunks
            .get_mut(&coord)
            .ok_or(VoxelError::Allocation {
                voxels: self.extent.volume(),
            })
    }

    /// Removes and returns the chunk at `coord`, or `None` if it was not resident.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let mut chunk = self.chunks.remove(&coord)?;
        chunk.set_resident(false);
        Some(chunk)
    }

    /// Returns `true` if a chunk is resident at `coord`.
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if no chunk is resident.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Iterates over all resident chunk coordinates.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    /// Iterates over all resident chunks.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    /// Mutable iteration over all resident chunks.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.chunks.values_mut()
    }

    /// Drops every resident chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
