//! Voxel storage error types.

/// Errors raised while creating or growing voxel storage.
#[derive(Debug, thiserror::Error)]
pub enum VoxelError {
    /// A chunk's voxel buffer, or room for it in the store, could not be allocated.
    #[error("failed to allocate {voxels} voxels for chunk")]
    Allocation {
        /// Number of voxels that were requested.
        voxels: usize,
    },
    /// A chunk extent with a zero or negative axis was requested.
    #[error("invalid chunk extent {width}x{height}x{depth}")]
    InvalidExtent {
        width: i32,
        height: i32,
        depth: i32,
    },
}
