//! Residency policy around a moving observer.
//!
//! The [`StreamingManager`] decides which chunk coordinates should be resident
//! and which should be evicted, but never touches chunk contents itself; the
//! [`World`](crate::World) carries out its decisions. A pass only runs when
//! the observer has crossed into a different chunk.
//!
//! Radii are in chunks. Horizontal distance is Euclidean over X/Z; vertical
//! distance is the absolute Y difference. The unload radii should be larger
//! than the load radii so chunks near the boundary do not thrash.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strata_voxel::{ChunkCoord, ChunkExtent, Region};

/// Streaming radii and the optional behind-view exclusion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Chunks within this X/Z radius of the observer's chunk are made resident.
    pub load_radius: i32,
    /// Chunks within this many layers above or below are made resident.
    pub vertical_load_radius: i32,
    /// Resident chunks beyond this X/Z radius are evicted.
    pub unload_radius: i32,
    /// Resident chunks beyond this many layers are evicted.
    pub vertical_unload_radius: i32,
    /// Skip and evict chunks far behind the view direction.
    pub exclude_behind_view: bool,
    /// How far behind counts as "far", as a fraction of the load radius.
    pub behind_view_threshold: f32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            load_radius: 3,
            vertical_load_radius: 1,
            unload_radius: 5,
            vertical_unload_radius: 2,
            exclude_behind_view: false,
            behind_view_threshold: 0.5,
        }
    }
}

/// What one streaming pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingReport {
    /// `true` if the observer stayed in the same chunk and nothing ran.
    pub skipped: bool,
    /// Chunks filled from their saved file.
    pub loaded: usize,
    /// Chunks filled by the terrain generator.
    pub generated: usize,
    /// Chunks removed from the store.
    pub evicted: usize,
    /// Evicted chunks that carried unsaved edits. Those edits are gone.
    pub dirty_evicted: Vec<ChunkCoord>,
}

/// Remembers the observer's last chunk and applies the residency rules.
#[derive(Clone, Debug)]
pub struct StreamingManager {
    config: StreamingConfig,
    last_observer: Option<ChunkCoord>,
}

impl StreamingManager {
    pub fn new(config: StreamingConfig) -> Self {
        if config.unload_radius < config.load_radius
            || config.vertical_unload_radius < config.vertical_load_radius
        {
            tracing::warn!(
                "unload radii ({}, {}) smaller than load radii ({}, {}); chunks will thrash",
                config.unload_radius,
                config.vertical_unload_radius,
                config.load_radius,
                config.vertical_load_radius
            );
        }
        Self {
            config,
            last_observer: None,
        }
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    /// Chunk the last completed pass was centred on.
    pub fn last_observer(&self) -> Option<ChunkCoord> {
        self.last_observer
    }

    /// Returns `true` if a pass centred on `center` has not yet run.
    pub fn needs_update(&self, center: ChunkCoord) -> bool {
        self.last_observer != Some(center)
    }

    /// Records a completed pass.
    pub fn mark_updated(&mut self, center: ChunkCoord) {
        self.last_observer = Some(center);
    }

    /// Forces the next pass to run even if the observer has not moved.
    pub fn invalidate(&mut self) {
        self.last_observer = None;
    }

    /// Coordinates that should be resident, nearest first.
    pub fn load_candidates(
        &self,
        center: ChunkCoord,
        observer: Vec3,
        forward: Vec3,
        extent: ChunkExtent,
    ) -> Vec<ChunkCoord> {
        let r = self.config.load_radius.max(0);
        let rv = self.config.vertical_load_radius.max(0);
        let mut out = Vec::new();
        for dy in -rv..=rv {
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dz * dz > r * r {
                        continue;
                    }
                    let coord = center.offset(dx, dy, dz);
                    if self.is_behind_view(coord, center, observer, forward, extent) {
                        continue;
                    }
                    out.push(coord);
                }
            }
        }
        out.sort_by_key(|c| (distance_sq(*c, center), *c));
        out
    }

    /// Returns `true` if a resident chunk at `coord` should be evicted.
    pub fn should_evict(
        &self,
        coord: ChunkCoord,
        center: ChunkCoord,
        observer: Vec3,
        forward: Vec3,
        extent: ChunkExtent,
    ) -> bool {
        let (dx, dy, dz) = (coord.x - center.x, coord.y - center.y, coord.z - center.z);
        let ur = self.config.unload_radius;
        let horizontal_sq = i64::from(dx) * i64::from(dx) + i64::from(dz) * i64::from(dz);
        horizontal_sq > i64::from(ur) * i64::from(ur)
            || dy.unsigned_abs() > self.config.vertical_unload_radius.unsigned_abs()
            || self.is_behind_view(coord, center, observer, forward, extent)
    }

    /// View-cone heuristic: the chunk centre lies far behind the observer.
    ///
    /// The observer's own chunk is never behind the view.
    fn is_behind_view(
        &self,
        coord: ChunkCoord,
        center: ChunkCoord,
        observer: Vec3,
        forward: Vec3,
        extent: ChunkExtent,
    ) -> bool {
        if !self.config.exclude_behind_view || coord == center {
            return false;
        }
        let Some(forward) = forward.try_normalize() else {
            return false;
        };
        let to_center = Region::of_chunk(coord, extent).center() - observer;
        let limit = self.config.behind_view_threshold
            * self.config.load_radius.max(1) as f32
            * extent.width() as f32;
        to_center.dot(forward) < -limit
    }
}

/// Squared 3D distance between chunk coordinates.
pub fn distance_sq(a: ChunkCoord, b: ChunkCoord) -> i64 {
    let dx = i64::from(a.x - b.x);
    let dy = i64::from(a.y - b.y);
    let dz = i64::from(a.z - b.z);
    dx * dx + dy * dy + dz * dz
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
