//! Closed-form height-field terrain.
//!
//! Column height is a base offset plus two periodic terms of different
//! frequency and amplitude. Trigonometry goes through `libm` so the same
//! column yields the same height on every platform, which is what lets an
//! unedited chunk be evicted and regenerated instead of saved.

use glam::IVec3;
use serde::{Deserialize, Serialize};
use strata_voxel::{Chunk, VoxelKind};

use crate::TerrainGenerator;

/// Shape of the height field and its layering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightFieldParams {
    /// Mean surface height in world voxels.
    pub base_height: f64,
    /// Amplitude of the broad rolling term.
    pub primary_amplitude: f64,
    /// Frequency (radians per voxel) of the broad term.
    pub primary_frequency: f64,
    /// Amplitude of the short diagonal ripple term.
    pub secondary_amplitude: f64,
    /// Frequency (radians per voxel) of the ripple term.
    pub secondary_frequency: f64,
    /// World y of the single bedrock layer; everything below is empty.
    pub min_depth: i32,
    /// Number of dirt layers directly under the grass voxel.
    pub dirt_depth: i32,
}

impl Default for HeightFieldParams {
    fn default() -> Self {
        Self {
            base_height: 20.0,
            primary_amplitude: 6.0,
            primary_frequency: 0.05,
            secondary_amplitude: 2.5,
            secondary_frequency: 0.13,
            min_depth: 0,
            dirt_depth: 3,
        }
    }
}

/// Deterministic height-field generator.
#[derive(Clone, Debug, Default)]
pub struct HeightFieldGenerator {
    params: HeightFieldParams,
}

impl HeightFieldGenerator {
    pub fn new(params: HeightFieldParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &HeightFieldParams {
        &self.params
    }

    /// Surface height of column `(x, z)`: the first empty y above the ground.
    pub fn column_height(&self, x: i32, z: i32) -> i32 {
        let p = &self.params;
        let (fx, fz) = (x as f64, z as f64);
        let broad = p.primary_amplitude
            * libm::sin(fx * p.primary_frequency)
            * libm::cos(fz * p.primary_frequency);
        let ripple = p.secondary_amplitude * libm::sin((fx + fz) * p.secondary_frequency);
        libm::floor(p.base_height + broad + ripple) as i32
    }

    /// Kind of the voxel at world height `y` in a column of surface `height`.
    pub fn kind_at(&self, y: i32, height: i32) -> VoxelKind {
        let p = &self.params;
        if y < p.min_depth {
            VoxelKind::Empty
        } else if y == p.min_depth {
            VoxelKind::Bedrock
        } else if y >= height {
            VoxelKind::Empty
        } else if y == height - 1 {
            VoxelKind::Grass
        } else if y >= height - 1 - p.dirt_depth {
            VoxelKind::Dirt
        } else {
            VoxelKind::Stone
        }
    }
}

impl TerrainGenerator for HeightFieldGenerator {
    fn fill_chunk(&self, chunk: &mut Chunk) {
        let origin = chunk.origin();
        let extent = chunk.extent();
        let width = extent.width();

        // One height per column, indexed z-major like the chunk's xz plane.
        let heights: Vec<i32> = (0..extent.depth())
            .flat_map(|z| (0..width).map(move |x| (x, z)))
            .map(|(x, z)| self.column_height(origin.x + x, origin.z + z))
            .collect();

        chunk.generate_with(|local: IVec3| {
            let height = heights[(local.z * width + local.x) as usize];
            self.kind_at(origin.y + local.y, height)
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strata_voxel::{ChunkCoord, ChunkExtent};

    use super::*;

    fn filled(generator: &HeightFieldGenerator, coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::new(coord, ChunkExtent::new(16, 32, 16).unwrap()).unwrap();
        generator.fill_chunk(&mut chunk);
        chunk
    }

    #[test]
    fn test_same_coordinate_generates_identical_contents() {
        let generator = HeightFieldGenerator::default();
        for coord in [
            ChunkCoord::new(0, 0, 0),
            ChunkCoord::new(-3, 0, 7),
            ChunkCoord::new(12, 1, -40),
        ] {
            let a = filled(&generator, coord);
            let b = filled(&generator, coord);
            assert_eq!(a.voxels(), b.voxels());
            assert!(a.is_generated());
            assert!(!a.is_modified());
        }
    }

    #[test]
    fn test_column_layering() {
        let generator = HeightFieldGenerator::default();
        let chunk = filled(&generator, ChunkCoord::new(0, 0, 0));
        let (x, z) = (5, 9);
        let h = generator.column_height(x, z);
        assert!(h > 5 && h < 32, "height {h} outside chunk for this test");

        assert_eq!(chunk.get(IVec3::new(x, 0, z)), VoxelKind::Bedrock);
        assert_eq!(chunk.get(IVec3::new(x, 1, z)), VoxelKind::Stone);
        assert_eq!(chunk.get(IVec3::new(x, h - 1, z)), VoxelKind::Grass);
        for y in h - 4..h - 1 {
            assert_eq!(chunk.get(IVec3::new(x, y, z)), VoxelKind::Dirt);
        }
        assert_eq!(chunk.get(IVec3::new(x, h - 5, z)), VoxelKind::Stone);
        assert_eq!(chunk.get(IVec3::new(x, h, z)), VoxelKind::Empty);
    }

    #[test]
    fn test_below_min_depth_is_empty() {
        let generator = HeightFieldGenerator::default();
        let chunk = filled(&generator, ChunkCoord::new(0, -1, 0));
        assert_eq!(chunk.solid_count(), 0);
    }

    #[test]
    fn test_exactly_one_bedrock_per_column() {
        let generator = HeightFieldGenerator::new(HeightFieldParams {
            min_depth: 3,
            ..Default::default()
        });
        let chunk = filled(&generator, ChunkCoord::new(2, 0, -2));
        let bedrock = chunk
            .voxels()
            .iter()
            .filter(|v| v.kind() == VoxelKind::Bedrock)
            .count();
        assert_eq!(bedrock, 16 * 16);
        assert_eq!(generator.kind_at(2, 40), VoxelKind::Empty);
    }

    #[test]
    fn test_height_varies_across_columns() {
        let generator = HeightFieldGenerator::default();
        let heights: Vec<i32> = (0..64).map(|x| generator.column_height(x, 0)).collect();
        let min = heights.iter().min().unwrap();
        let max = heights.iter().max().unwrap();
        assert!(max > min);
    }
}
