//! The streamed, persisted voxel world.

mod error;
pub mod streaming;
mod world;

pub use error::WorldError;
pub use streaming::{StreamingConfig, StreamingManager, StreamingReport};
pub use world::{Residency, SaveSummary, World, WorldSettings};
