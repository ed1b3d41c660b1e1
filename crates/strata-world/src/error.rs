//! World error types.

use strata_storage::StorageError;
use strata_voxel::{ChunkExtent, VoxelError};

/// Errors raised by world operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Voxel(#[from] VoxelError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The saved world was written with a different chunk extent.
    #[error("world was saved with chunk extent {saved:?}, configured extent is {configured:?}")]
    ExtentMismatch {
        saved: ChunkExtent,
        configured: ChunkExtent,
    },
}
