//! The top-level config, its local sections and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_physics::{DEFAULT_RAY_STEP, DEFAULT_REACH, PhysicsConfig};
use strata_visibility::RenderConfig;
use strata_world::{StreamingConfig, WorldSettings};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World name, save location, chunk extent and terrain.
    pub world: WorldSettings,
    /// Chunk residency radii.
    pub streaming: StreamingConfig,
    /// View volume and lighting.
    pub render: RenderConfig,
    /// Body movement and collision.
    pub physics: PhysicsConfig,
    /// Break/place reach.
    pub interaction: InteractionConfig,
    pub debug: DebugConfig,
}

/// Break/place ray settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maximum ray length in blocks.
    pub reach: f32,
    /// Sampling interval along the ray.
    pub ray_step: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reach: DEFAULT_REACH,
            ray_step: DEFAULT_RAY_STEP,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter used when `RUST_LOG` is unset (e.g. "debug", "info,strata_world=trace").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for strata, e.g. `~/.config/strata`.
///
/// Falls back to `./config` when the platform has no config directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("strata"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read_file(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::Write {
            path: config_path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file on disk differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let new_config = Self::read_file(&config_path)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.sanitize();
        Ok(config)
    }

    /// Replaces values that would break a subsystem with their defaults.
    pub fn sanitize(&mut self) {
        let render = RenderConfig::default();
        if !is_positive(self.render.render_distance) {
            log::warn!(
                "render_distance {} is not positive, using {}",
                self.render.render_distance,
                render.render_distance
            );
            self.render.render_distance = render.render_distance;
        }
        if !is_positive(self.render.fov_y_degrees) || self.render.fov_y_degrees >= 180.0 {
            log::warn!(
                "fov_y_degrees {} out of range, using {}",
                self.render.fov_y_degrees,
                render.fov_y_degrees
            );
            self.render.fov_y_degrees = render.fov_y_degrees;
        }

        let interaction = InteractionConfig::default();
        if !is_positive(self.interaction.ray_step) {
            log::warn!(
                "ray_step {} is not positive, using {}",
                self.interaction.ray_step,
                interaction.ray_step
            );
            self.interaction.ray_step = interaction.ray_step;
        }
        if !is_positive(self.interaction.reach) {
            log::warn!(
                "reach {} is not positive, using {}",
                self.interaction.reach,
                interaction.reach
            );
            self.interaction.reach = interaction.reach;
        }

        let streaming = &mut self.streaming;
        for radius in [
            &mut streaming.load_radius,
            &mut streaming.vertical_load_radius,
            &mut streaming.unload_radius,
            &mut streaming.vertical_unload_radius,
        ] {
            if *radius < 0 {
                log::warn!("negative streaming radius {}, using 0", *radius);
                *radius = 0;
            }
        }

        if self.physics.capsule_samples < 2 {
            log::warn!(
                "capsule_samples {} below 2, using 2",
                self.physics.capsule_samples
            );
            self.physics.capsule_samples = 2;
        }
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
