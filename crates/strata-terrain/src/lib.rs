//! Deterministic procedural fill for newly resident chunks.

mod height_field;

use serde::{Deserialize, Serialize};
use strata_voxel::{Chunk, VoxelKind};

pub use height_field::{HeightFieldGenerator, HeightFieldParams};

/// Produces the initial contents of a chunk from its coordinate alone.
///
/// Implementations must be pure: the same chunk coordinate always yields the
/// same voxels, independent of call order or any other world state.
pub trait TerrainGenerator {
    /// Overwrites `chunk` with generated contents and marks it generated.
    fn fill_chunk(&self, chunk: &mut Chunk);
}

/// Generates nothing; every chunk is empty air.
#[derive(Clone, Copy, Debug, Default)]
pub struct VoidGenerator;

impl TerrainGenerator for VoidGenerator {
    fn fill_chunk(&self, chunk: &mut Chunk) {
        chunk.generate_with(|_| VoxelKind::Empty);
    }
}

/// Flat ground: `kind` for every world y below `surface`.
#[derive(Clone, Copy, Debug)]
pub struct FlatGenerator {
    pub surface: i32,
    pub kind: VoxelKind,
}

impl TerrainGenerator for FlatGenerator {
    fn fill_chunk(&self, chunk: &mut Chunk) {
        let base_y = chunk.origin().y;
        chunk.generate_with(|local| {
            if base_y + local.y < self.surface {
                self.kind
            } else {
                VoxelKind::Empty
            }
        });
    }
}

/// Serializable choice of generator, as stored in configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TerrainSettings {
    HeightField(HeightFieldParams),
    Flat { surface: i32, kind: VoxelKind },
    Void,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        TerrainSettings::HeightField(HeightFieldParams::default())
    }
}

impl TerrainSettings {
    /// Builds the generator these settings describe.
    pub fn build(&self) -> Box<dyn TerrainGenerator> {
        match self {
            TerrainSettings::HeightField(params) => {
                Box::new(HeightFieldGenerator::new(params.clone()))
            }
            TerrainSettings::Flat { surface, kind } => Box::new(FlatGenerator {
                surface: *surface,
                kind: *kind,
            }),
            TerrainSettings::Void => Box::new(VoidGenerator),
        }
    }
}
