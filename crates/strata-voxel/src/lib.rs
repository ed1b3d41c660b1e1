//! Voxel kinds, chunk addressing, dense chunk storage and point queries.

pub mod addressing;
pub mod bounded;
pub mod chunk;
pub mod chunk_store;
pub mod error;
pub mod kind;
pub mod query;

pub use addressing::{
    ChunkCoord, ChunkExtent, chunk_of_position, chunk_origin, chunk_to_local, split, to_world,
    world_to_chunk,
};
pub use bounded::BoundedGrid;
pub use chunk::Chunk;
pub use chunk_store::ChunkStore;
pub use error::VoxelError;
pub use kind::{ColorTable, Rgba, Voxel, VoxelKind};
pub use query::{Region, VoxelRead, VoxelWrite};
