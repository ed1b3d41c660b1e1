//! Mapping between world voxel coordinates and `(chunk, local)` pairs.
//!
//! Chunk coordinates use floored division, so `-1` lands in chunk `-1` at the
//! last local index rather than in chunk `0`. Local coordinates are always in
//! `[0, extent)` on every axis.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::VoxelError;

/// Identifies a chunk's position in chunk space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate offset by `(dx, dy, dz)` chunks.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Side lengths of a chunk in voxels.
///
/// Every axis is at least 1; [`ChunkExtent::new`] enforces this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawExtent", into = "RawExtent")]
pub struct ChunkExtent {
    width: i32,
    height: i32,
    depth: i32,
}

impl ChunkExtent {
    /// 32 × 64 × 32.
    pub const DEFAULT: ChunkExtent = ChunkExtent {
        width: 32,
        height: 64,
        depth: 32,
    };

    /// Creates an extent, rejecting any axis below 1.
    pub fn new(width: i32, height: i32, depth: i32) -> Result<Self, VoxelError> {
        if width < 1 || height < 1 || depth < 1 {
            return Err(VoxelError::InvalidExtent {
                width,
                height,
                depth,
            });
        }
        Ok(Self {
            width,
            height,
            depth,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// The extent as a vector `(width, height, depth)`.
    pub fn as_ivec3(&self) -> IVec3 {
        IVec3::new(self.width, self.height, self.depth)
    }

    /// Number of voxels in one chunk.
    pub fn volume(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Linear index of a local coordinate (y-major, then z, then x).
    ///
    /// Returns `None` if the coordinate is outside `[0, extent)`.
    pub fn linear_index(&self, local: IVec3) -> Option<usize> {
        if !self.contains_local(local) {
            return None;
        }
        let (x, y, z) = (local.x as usize, local.y as usize, local.z as usize);
        Some((y * self.depth as usize + z) * self.width as usize + x)
    }

    /// Inverse of [`ChunkExtent::linear_index`].
    pub fn local_from_index(&self, index: usize) -> IVec3 {
        let w = self.width as usize;
        let d = self.depth as usize;
        let x = index % w;
        let z = (index / w) % d;
        let y = index / (w * d);
        IVec3::new(x as i32, y as i32, z as i32)
    }

    /// Returns `true` if every component of `local` is in `[0, extent)`.
    pub fn contains_local(&self, local: IVec3) -> bool {
        (0..self.width).contains(&local.x)
            && (0..self.height).contains(&local.y)
            && (0..self.depth).contains(&local.z)
    }
}

impl Default for ChunkExtent {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Serialize, Deserialize)]
struct RawExtent {
    width: i32,
    height: i32,
    depth: i32,
}

impl TryFrom<RawExtent> for ChunkExtent {
    type Error = VoxelError;

    fn try_from(raw: RawExtent) -> Result<Self, Self::Error> {
        ChunkExtent::new(raw.width, raw.height, raw.depth)
    }
}

impl From<ChunkExtent> for RawExtent {
    fn from(extent: ChunkExtent) -> Self {
        Self {
            width: extent.width,
            height: extent.height,
            depth: extent.depth,
        }
    }
}

/// Returns the chunk containing world voxel `world` (floored division per axis).
pub fn world_to_chunk(world: IVec3, extent: ChunkExtent) -> ChunkCoord {
    let c = world.div_euclid(extent.as_ivec3());
    ChunkCoord::new(c.x, c.y, c.z)
}

/// Returns the position of world voxel `world` inside its chunk.
pub fn chunk_to_local(world: IVec3, extent: ChunkExtent) -> IVec3 {
    world.rem_euclid(extent.as_ivec3())
}

/// Splits `world` into its `(chunk, local)` pair.
pub fn split(world: IVec3, extent: ChunkExtent) -> (ChunkCoord, IVec3) {
    (world_to_chunk(world, extent), chunk_to_local(world, extent))
}

/// World coordinate of the voxel at local `(0, 0, 0)` of `chunk`.
pub fn chunk_origin(chunk: ChunkCoord, extent: ChunkExtent) -> IVec3 {
    IVec3::new(chunk.x, chunk.y, chunk.z) * extent.as_ivec3()
}

/// Recombines a `(chunk, local)` pair into a world coordinate.
pub fn to_world(chunk: ChunkCoord, local: IVec3, extent: ChunkExtent) -> IVec3 {
    chunk_origin(chunk, extent) + local
}

/// Chunk containing a continuous world-space position.
pub fn chunk_of_position(position: glam::Vec3, extent: ChunkExtent) -> ChunkCoord {
    world_to_chunk(position.floor().as_ivec3(), extent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
