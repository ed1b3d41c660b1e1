//! Render distance, field of view and lighting settings.

use serde::{Deserialize, Serialize};

/// View volume and lighting constants for the culler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Nothing farther than this from the eye is drawn, in blocks.
    pub render_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Viewport width over height.
    pub aspect: f32,
    /// Voxels closer than this skip the field-of-view test.
    pub near_block_radius: f32,
    /// Chunks whose centre is closer than this skip the cone test.
    pub near_chunk_radius: f32,
    /// Cells scanned above a face's open neighbour for sky exposure.
    pub sky_scan: u32,
    /// Exposure of a cell with open sky above.
    pub lit: f32,
    /// Exposure of a cell with something overhead.
    pub shadowed: f32,
    pub top_face: f32,
    pub side_face: f32,
    pub bottom_face: f32,
    /// Floor applied to the final face brightness.
    pub min_brightness: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            render_distance: 50.0,
            fov_y_degrees: 110.0,
            aspect: 800.0 / 600.0,
            near_block_radius: 15.0,
            near_chunk_radius: 40.0,
            sky_scan: 4,
            lit: 1.0,
            shadowed: 0.6,
            top_face: 1.0,
            side_face: 0.75,
            bottom_face: 0.5,
            min_brightness: 0.25,
        }
    }
}
