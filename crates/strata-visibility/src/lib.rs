//! Visibility culling and approximate lighting for voxel regions.
//!
//! A pass runs in four stages: whole regions against the view distance and
//! cone, then each non-empty voxel against distance, occlusion by its six
//! neighbours and the field of view, and finally each face against the
//! camera direction and its neighbour. Surviving faces are lit with a
//! per-orientation multiplier and a sky-exposure scan.

mod config;
mod cull;
mod face;
mod frustum;
mod lighting;

pub use config::RenderConfig;
pub use cull::{CullStats, DrawableFace, cull_and_light, is_occluded, region_visible};
pub use face::Face;
pub use frustum::{ViewFrustum, look_direction};
pub use lighting::{face_brightness, face_multiplier, sky_exposure};
