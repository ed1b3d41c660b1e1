//! The infinite chunked world.
//!
//! [`World`] ties the chunk store to terrain generation, persistence and the
//! streaming policy. It is the "infinite" addressing strategy: reads of
//! non-resident cells are `Empty`, and writes make the owning chunk resident
//! (loading or generating it first) so later fills never clobber an edit.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use strata_storage::{DiskStorage, StorageBackend, WorldMetadata, WorldName, WorldStorage};
use strata_terrain::{TerrainGenerator, TerrainSettings};
use strata_voxel::{
    Chunk, ChunkCoord, ChunkExtent, ChunkStore, ColorTable, Region, VoxelKind, VoxelRead,
    VoxelWrite, chunk_of_position, split,
};

use crate::error::WorldError;
use crate::streaming::{StreamingConfig, StreamingManager, StreamingReport};

/// Identity and shape of a world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Namespaces every saved file. See [`WorldName`] for the accepted characters.
    pub name: String,
    /// Directory that holds every world's files.
    pub save_root: PathBuf,
    pub chunk_extent: ChunkExtent,
    pub terrain: TerrainSettings,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            name: "world".to_string(),
            save_root: PathBuf::from("worlds"),
            chunk_extent: ChunkExtent::DEFAULT,
            terrain: TerrainSettings::default(),
        }
    }
}

/// How a chunk became resident.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Residency {
    AlreadyResident,
    Loaded,
    Generated,
}

/// Outcome of [`World::world_save`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveSummary {
    pub chunks_written: usize,
    pub timestamp: u64,
}

/// Resident chunks plus everything needed to fill, save and stream them.
pub struct World {
    store: ChunkStore,
    storage: WorldStorage,
    generator: Box<dyn TerrainGenerator>,
    streaming: StreamingManager,
    colors: ColorTable,
}

impl World {
    /// Opens (or starts) a world on an arbitrary storage backend.
    ///
    /// Nothing is made resident yet. Fails if the name is invalid or if an
    /// existing save used a different chunk extent.
    pub fn open(
        settings: &WorldSettings,
        streaming: StreamingConfig,
        backend: Box<dyn StorageBackend>,
    ) -> Result<Self, WorldError> {
        let name = WorldName::new(settings.name.clone())?;
        let storage = WorldStorage::new(name, backend);

        match storage.read_metadata()? {
            Some(meta) => {
                if let Some(saved) = meta.chunk_extent
                    && saved != settings.chunk_extent
                {
                    return Err(WorldError::ExtentMismatch {
                        saved,
                        configured: settings.chunk_extent,
                    });
                }
                tracing::info!(
                    "Opened world '{}' (last saved {}, {} chunks)",
                    meta.name,
                    meta.last_saved,
                    meta.chunk_count
                );
            }
            None => tracing::info!("Starting new world '{}'", storage.name()),
        }

        Ok(Self {
            store: ChunkStore::new(settings.chunk_extent),
            storage,
            generator: settings.terrain.build(),
            streaming: StreamingManager::new(streaming),
            colors: ColorTable::default(),
        })
    }

    /// Opens a world saved under `settings.save_root` on the real filesystem.
    pub fn open_on_disk(
        settings: &WorldSettings,
        streaming: StreamingConfig,
    ) -> Result<Self, WorldError> {
        let backend = DiskStorage::new(settings.save_root.clone());
        Self::open(settings, streaming, Box::new(backend))
    }

    /// Replaces the terrain generator.
    pub fn with_generator(mut self, generator: Box<dyn TerrainGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_colors(mut self, colors: ColorTable) -> Self {
        self.colors = colors;
        self
    }

    pub fn name(&self) -> &WorldName {
        self.storage.name()
    }

    pub fn extent(&self) -> ChunkExtent {
        self.store.extent()
    }

    pub fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    pub fn storage(&self) -> &WorldStorage {
        &self.storage
    }

    pub fn streaming(&self) -> &StreamingManager {
        &self.streaming
    }

    /// Culling regions for every resident, generated chunk.
    pub fn regions(&self) -> Vec<Region> {
        let extent = self.extent();
        self.store
            .iter()
            .filter(|c| c.is_generated())
            .map(|c| Region::of_chunk(c.coord(), extent))
            .collect()
    }

    /// Makes `coord` resident and filled: from its file if one is usable,
    /// otherwise from the terrain generator.
    ///
    /// On failure no half-filled chunk is left in the store.
    pub fn ensure_resident(&mut self, coord: ChunkCoord) -> Result<Residency, WorldError> {
        let was_resident = self.store.contains(coord);
        let chunk = self.store.insert(coord)?;
        if chunk.is_generated() {
            return Ok(Residency::AlreadyResident);
        }

        match fill_chunk(chunk, &self.storage, self.generator.as_ref()) {
            Ok(residency) => Ok(residency),
            Err(e) => {
                if !was_resident {
                    self.store.remove(coord);
                }
                Err(e)
            }
        }
    }

    /// Runs a streaming pass if the observer has entered a different chunk.
    pub fn update_streaming(
        &mut self,
        observer: Vec3,
        forward: Vec3,
    ) -> Result<StreamingReport, WorldError> {
        let extent = self.extent();
        let center = chunk_of_position(observer, extent);
        if !self.streaming.needs_update(center) {
            return Ok(StreamingReport {
                skipped: true,
                ..Default::default()
            });
        }

        let mut report = StreamingReport::default();
        for coord in self
            .streaming
            .load_candidates(center, observer, forward, extent)
        {
            match self.ensure_resident(coord)? {
                Residency::AlreadyResident => {}
                Residency::Loaded => report.loaded += 1,
                Residency::Generated => report.generated += 1,
            }
        }

        // Decide first, then remove, so no resident chunk is skipped.
        let doomed: Vec<ChunkCoord> = self
            .store
            .coords()
            .filter(|&c| {
                self.streaming
                    .should_evict(c, center, observer, forward, extent)
            })
            .collect();
        for coord in doomed {
            if let Some(chunk) = self.store.remove(coord) {
                report.evicted += 1;
                if chunk.is_modified() {
                    tracing::warn!(
                        "Evicted chunk ({}, {}, {}) with unsaved edits; they are lost",
                        coord.x,
                        coord.y,
                        coord.z
                    );
                    report.dirty_evicted.push(coord);
                }
            }
        }

        self.streaming.mark_updated(center);
        tracing::debug!(
            "Streaming around ({}, {}, {}): {} loaded, {} generated, {} evicted, {} resident",
            center.x,
            center.y,
            center.z,
            report.loaded,
            report.generated,
            report.evicted,
            self.store.len()
        );
        Ok(report)
    }

    /// Writes every resident chunk and the metadata file.
    ///
    /// Chunks that are not resident are left as they are on disk.
    pub fn world_save(&mut self) -> Result<SaveSummary, WorldError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.save_at(timestamp)
    }

    /// [`World::world_save`] with an explicit timestamp.
    pub fn save_at(&mut self, timestamp: u64) -> Result<SaveSummary, WorldError> {
        self.storage.prepare()?;
        let mut written = 0;
        for chunk in self.store.iter_mut() {
            self.storage.save_chunk(chunk)?;
            chunk.clear_modified();
            written += 1;
        }
        self.storage.write_metadata(&WorldMetadata {
            name: self.storage.name().to_string(),
            last_saved: timestamp,
            chunk_count: written,
            chunk_extent: Some(self.extent()),
        })?;
        tracing::info!("Saved world '{}': {written} chunks", self.storage.name());
        Ok(SaveSummary {
            chunks_written: written,
            timestamp,
        })
    }

    /// Reads the saved metadata, if the world was ever saved.
    pub fn metadata(&self) -> Result<Option<WorldMetadata>, WorldError> {
        Ok(self.storage.read_metadata()?)
    }

    /// Drops every resident chunk without saving and resets streaming.
    pub fn unload_all(&mut self) {
        self.store.clear();
        self.streaming.invalidate();
    }
}

fn fill_chunk(
    chunk: &mut Chunk,
    storage: &WorldStorage,
    generator: &dyn TerrainGenerator,
) -> Result<Residency, WorldError> {
    if storage.load_into(chunk)? {
        tracing::debug!("Loaded chunk {:?} from disk", chunk.coord());
        return Ok(Residency::Loaded);
    }
    generator.fill_chunk(chunk);
    chunk.mark_generated();
    Ok(Residency::Generated)
}

impl VoxelRead for World {
    fn get_voxel(&self, pos: IVec3) -> VoxelKind {
        self.store.get_voxel(pos)
    }
}

impl VoxelWrite for World {
    type Error = WorldError;

    fn set_voxel(&mut self, pos: IVec3, kind: VoxelKind) -> Result<(), WorldError> {
        let (coord, local) = split(pos, self.extent());
        self.ensure_resident(coord)?;
        if let Some(chunk) = self.store.find_mut(coord) {
            chunk.set(local, kind);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use strata_storage::{MemoryStorage, chunk_path};
    use strata_terrain::HeightFieldGenerator;

    use super::*;

    fn settings() -> WorldSettings {
        WorldSettings {
            name: "unit".into(),
            chunk_extent: ChunkExtent::new(8, 16, 8).unwrap(),
            ..Default::default()
        }
    }

    fn streaming(load: i32, unload: i32) -> StreamingConfig {
        StreamingConfig {
            load_radius: load,
            vertical_load_radius: 0,
            unload_radius: unload,
            vertical_unload_radius: 0,
            ..Default::default()
        }
    }

    fn world(mem: &MemoryStorage) -> World {
        World::open(&settings(), streaming(1, 2), Box::new(mem.clone())).unwrap()
    }

    #[test]
    fn test_invalid_name_rejected() {
        let bad = WorldSettings {
            name: "no spaces".into(),
            ..settings()
        };
        let r = World::open(&bad, streaming(1, 2), Box::new(MemoryStorage::new()));
        assert!(matches!(r, Err(WorldError::Storage(_))));
    }

    #[test]
    fn test_negative_write_example() {
        let mut w = World::open(
            &WorldSettings {
                name: "neg".into(),
                terrain: TerrainSettings::Void,
                ..Default::default()
            },
            StreamingConfig::default(),
            Box::new(MemoryStorage::new()),
        )
        .unwrap();
        w.set_voxel(IVec3::new(-1, 0, -1), VoxelKind::Stone).unwrap();
        let chunk = w.store().find(ChunkCoord::new(-1, 0, -1)).unwrap();
        assert_eq!(chunk.get(IVec3::new(31, 0, 31)), VoxelKind::Stone);
        assert_eq!(w.get_voxel(IVec3::new(-1, 0, -1)), VoxelKind::Stone);
    }

    #[test]
    fn test_write_into_unloaded_chunk_keeps_terrain() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        let generator = HeightFieldGenerator::default();
        let h = generator.column_height(3, 3);
        assert_eq!((h - 1) / 16, (h + 2) / 16, "test needs surface and edit in one chunk");
        w.set_voxel(IVec3::new(3, h + 2, 3), VoxelKind::Wood).unwrap();
        assert_eq!(w.get_voxel(IVec3::new(3, h + 2, 3)), VoxelKind::Wood);
        assert_eq!(w.get_voxel(IVec3::new(3, h - 1, 3)), VoxelKind::Grass);
        let chunk = w.store().find(ChunkCoord::new(0, (h + 2) / 16, 0)).unwrap();
        assert!(chunk.is_generated());
        assert!(chunk.is_modified());
    }

    #[test]
    fn test_unwritten_unloaded_voxel_is_empty() {
        let mem = MemoryStorage::new();
        let w = world(&mem);
        assert_eq!(w.get_voxel(IVec3::new(0, 0, 0)), VoxelKind::Empty);
        assert_eq!(w.get_voxel(IVec3::new(-77, 5, 1000)), VoxelKind::Empty);
    }

    #[test]
    fn test_streaming_skips_when_observer_stays_in_chunk() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        let first = w.update_streaming(Vec3::new(1.0, 1.0, 1.0), Vec3::Z).unwrap();
        assert!(!first.skipped);
        assert_eq!(first.generated, 5);
        let second = w.update_streaming(Vec3::new(6.5, 2.0, 7.9), Vec3::X).unwrap();
        assert!(second.skipped);
        assert_eq!(w.store().len(), 5);
    }

    #[test]
    fn test_streaming_evicts_far_chunks() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        w.update_streaming(Vec3::new(1.0, 1.0, 1.0), Vec3::Z).unwrap();
        let report = w.update_streaming(Vec3::new(8.0 * 3.0 + 1.0, 1.0, 1.0), Vec3::Z).unwrap();
        // New centre (3, 0, 0); (-1, 0, 0) is 4 away, beyond the unload radius of 2.
        assert!(w.store().find(ChunkCoord::new(-1, 0, 0)).is_none());
        assert!(w.store().find(ChunkCoord::new(3, 0, 0)).is_some());
        assert!(report.evicted >= 1);
        assert!(report.dirty_evicted.is_empty());
    }

    #[test]
    fn test_evicting_edited_chunk_reports_it_and_does_not_save() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        w.update_streaming(Vec3::new(1.0, 1.0, 1.0), Vec3::Z).unwrap();
        w.set_voxel(IVec3::new(-3, 10, 2), VoxelKind::Sand).unwrap();
        let report = w.update_streaming(Vec3::new(8.0 * 5.0, 1.0, 1.0), Vec3::Z).unwrap();
        assert!(report.dirty_evicted.contains(&ChunkCoord::new(-1, 0, 0)));
        assert_eq!(mem.file_count(), 0);
    }

    #[test]
    fn test_regenerated_chunk_matches_after_eviction() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        w.ensure_resident(ChunkCoord::new(2, 0, -1)).unwrap();
        let before = w.store().find(ChunkCoord::new(2, 0, -1)).unwrap().voxels().to_vec();
        w.unload_all();
        assert_eq!(
            w.ensure_resident(ChunkCoord::new(2, 0, -1)).unwrap(),
            Residency::Generated
        );
        let after = w.store().find(ChunkCoord::new(2, 0, -1)).unwrap().voxels();
        assert_eq!(before.as_slice(), after);
    }

    #[test]
    fn test_save_clear_load_reproduces_voxels() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        w.update_streaming(Vec3::new(1.0, 1.0, 1.0), Vec3::Z).unwrap();
        w.set_voxel(IVec3::new(2, 15, 2), VoxelKind::Wood).unwrap();
        w.set_voxel(IVec3::new(-5, 0, 4), VoxelKind::Empty).unwrap();
        let snapshot: Vec<(ChunkCoord, Vec<_>)> = w
            .store()
            .iter()
            .map(|c| (c.coord(), c.voxels().to_vec()))
            .collect();

        let summary = w.save_at(1234).unwrap();
        assert_eq!(summary.chunks_written, snapshot.len());
        assert!(w.store().iter().all(|c| !c.is_modified()));

        // A generator that could never reproduce the saved contents.
        let mut reopened = World::open(&settings(), streaming(1, 2), Box::new(mem.clone()))
            .unwrap()
            .with_generator(Box::new(strata_terrain::VoidGenerator));
        for (coord, voxels) in &snapshot {
            assert_eq!(reopened.ensure_resident(*coord).unwrap(), Residency::Loaded);
            assert_eq!(reopened.store().find(*coord).unwrap().voxels(), voxels.as_slice());
        }

        let meta = reopened.metadata().unwrap().unwrap();
        assert_eq!(meta.last_saved, 1234);
        assert_eq!(meta.chunk_count, snapshot.len());
    }

    #[test]
    fn test_truncated_file_falls_back_to_generation() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        let coord = ChunkCoord::new(0, 0, 0);
        mem.put_file(chunk_path(w.name(), coord), vec![1, 1, 1]);
        assert_eq!(w.ensure_resident(coord).unwrap(), Residency::Generated);
    }

    #[test]
    fn test_extent_mismatch_is_an_error() {
        let mem = MemoryStorage::new();
        let mut w = world(&mem);
        w.save_at(1).unwrap();
        let other = WorldSettings {
            chunk_extent: ChunkExtent::new(4, 4, 4).unwrap(),
            ..settings()
        };
        assert!(matches!(
            World::open(&other, streaming(1, 2), Box::new(mem.clone())),
            Err(WorldError::ExtentMismatch { .. })
        ));
    }

    #[test]
    fn test_save_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let s = WorldSettings {
            save_root: dir.path().to_path_buf(),
            ..settings()
        };
        let mut w = World::open_on_disk(&s, streaming(0, 1)).unwrap();
        w.update_streaming(Vec3::new(1.0, 1.0, 1.0), Vec3::Z).unwrap();
        w.world_save().unwrap();
        assert!(dir.path().join("unit_chunks/chunk_0_0_0.chunk").is_file());
        assert!(dir.path().join("unit/world.txt").is_file());
        let len = std::fs::metadata(dir.path().join("unit_chunks/chunk_0_0_0.chunk"))
            .unwrap()
            .len();
        assert_eq!(len, 8 * 16 * 8);
    }
}
