//! Persistence error types.

use std::path::PathBuf;

use strata_voxel::VoxelError;

/// Errors raised while reading or writing world files.
///
/// A missing or truncated chunk file is not an error; loaders return
/// `Ok(None)` for those.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// World names are 1 to 64 ASCII letters, digits or underscores.
    #[error("invalid world name {0:?}")]
    InvalidWorldName(String),
    /// Memory for a loaded chunk could not be allocated.
    #[error(transparent)]
    Voxel(#[from] VoxelError),
}
