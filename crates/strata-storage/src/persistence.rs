//! Per-world chunk and metadata files on a [`StorageBackend`].
//!
//! Layout under the backend root:
//!
//! ```text
//! {world}_chunks/chunk_{cx}_{cy}_{cz}.chunk
//! {world}/world.txt
//! ```

use std::path::{Path, PathBuf};

use strata_voxel::{Chunk, ChunkCoord, ChunkExtent};

use crate::backend::StorageBackend;
use crate::codec::{self, DecodeFailure};
use crate::error::StorageError;
use crate::metadata::WorldMetadata;
use crate::world_name::WorldName;

/// File name of the metadata file inside the world directory.
pub const METADATA_FILE: &str = "world.txt";

/// Extension of per-chunk files.
pub const CHUNK_EXTENSION: &str = "chunk";

/// Directory holding a world's chunk files.
pub fn chunk_dir(world: &WorldName) -> PathBuf {
    PathBuf::from(format!("{world}_chunks"))
}

/// Path of one chunk's file, relative to the storage root.
pub fn chunk_path(world: &WorldName, coord: ChunkCoord) -> PathBuf {
    chunk_dir(world).join(format!(
        "chunk_{}_{}_{}.{CHUNK_EXTENSION}",
        coord.x, coord.y, coord.z
    ))
}

/// Path of the metadata file, relative to the storage root.
pub fn metadata_path(world: &WorldName) -> PathBuf {
    Path::new(world.as_str()).join(METADATA_FILE)
}

/// Reads and writes one world's files.
pub struct WorldStorage {
    name: WorldName,
    backend: Box<dyn StorageBackend>,
}

impl WorldStorage {
    pub fn new(name: WorldName, backend: Box<dyn StorageBackend>) -> Self {
        Self { name, backend }
    }

    pub fn name(&self) -> &WorldName {
        &self.name
    }

    /// Creates the chunk and metadata directories if needed.
    pub fn prepare(&self) -> Result<(), StorageError> {
        for dir in [chunk_dir(&self.name), PathBuf::from(self.name.as_str())] {
            self.backend
                .create_dir_all(&dir)
                .map_err(|source| StorageError::CreateDir { path: dir, source })?;
        }
        Ok(())
    }

    /// Writes one chunk's voxels, overwriting any previous file.
    pub fn save_chunk(&self, chunk: &Chunk) -> Result<(), StorageError> {
        let path = chunk_path(&self.name, chunk.coord());
        self.backend
            .write(&path, &codec::encode_chunk(chunk))
            .map_err(|source| StorageError::Write { path, source })
    }

    /// Fills `chunk` from its file if one exists and is complete.
    ///
    /// Returns `Ok(false)` when the file is missing, short, or holds an
    /// unknown kind tag; the chunk is then left untouched for the caller
    /// to generate.
    pub fn load_into(&self, chunk: &mut Chunk) -> Result<bool, StorageError> {
        let path = chunk_path(&self.name, chunk.coord());
        let Some(bytes) = self
            .backend
            .read(&path)
            .map_err(|source| StorageError::Read {
                path: path.clone(),
                source,
            })?
        else {
            return Ok(false);
        };

        match codec::decode_into(&bytes, chunk) {
            Ok(()) => Ok(true),
            Err(DecodeFailure::Truncated { expected, actual }) => {
                tracing::warn!(
                    "chunk file {} truncated ({actual} of {expected} bytes), regenerating",
                    path.display()
                );
                Ok(false)
            }
            Err(DecodeFailure::UnknownTag { index, tag }) => {
                tracing::warn!(
                    "chunk file {} has unknown tag {tag} at {index}, regenerating",
                    path.display()
                );
                Ok(false)
            }
        }
    }

    /// Loads a chunk into freshly allocated storage.
    pub fn load_chunk(
        &self,
        coord: ChunkCoord,
        extent: ChunkExtent,
    ) -> Result<Option<Chunk>, StorageError> {
        let mut chunk = Chunk::new(coord, extent)?;
        Ok(self.load_into(&mut chunk)?.then_some(chunk))
    }

    pub fn write_metadata(&self, meta: &WorldMetadata) -> Result<(), StorageError> {
        let path = metadata_path(&self.name);
        self.backend
            .write(&path, meta.to_text().as_bytes())
            .map_err(|source| StorageError::Write { path, source })
    }

    /// Reads `world.txt`, or `None` if the world was never saved.
    pub fn read_metadata(&self) -> Result<Option<WorldMetadata>, StorageError> {
        let path = metadata_path(&self.name);
        let bytes = self
            .backend
            .read(&path)
            .map_err(|source| StorageError::Read { path, source })?;
        Ok(bytes.map(|b| {
            let mut meta = WorldMetadata::parse(&String::from_utf8_lossy(&b));
            if meta.name.is_empty() {
                meta.name = self.name.to_string();
            }
            meta
        }))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
