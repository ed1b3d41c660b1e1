//! Chunk and world persistence over injectable storage backends.

mod backend;
mod codec;
mod error;
mod metadata;
mod persistence;
mod world_name;

pub use backend::{DiskStorage, MemoryStorage, StorageBackend};
pub use codec::{DecodeFailure, decode_into, encode_chunk};
pub use error::StorageError;
pub use metadata::WorldMetadata;
pub use persistence::{
    CHUNK_EXTENSION, METADATA_FILE, WorldStorage, chunk_dir, chunk_path, metadata_path,
};
pub use world_name::{MAX_WORLD_NAME_LEN, WorldName};
