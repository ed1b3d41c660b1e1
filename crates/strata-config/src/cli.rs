//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Headless strata voxel world runner")]
pub struct CliArgs {
    /// World to open (ASCII letters, digits and underscores).
    #[arg(long)]
    pub world: Option<String>,

    /// Directory that holds world saves.
    #[arg(long)]
    pub save_root: Option<PathBuf>,

    /// Render distance in blocks.
    #[arg(long)]
    pub render_distance: Option<f32>,

    /// Streaming load radius in chunks.
    #[arg(long)]
    pub load_radius: Option<i32>,

    /// Streaming unload radius in chunks.
    #[arg(long)]
    pub unload_radius: Option<i32>,

    /// Number of simulation ticks to run.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref name) = args.world {
            self.world.name = name.clone();
        }
        if let Some(ref root) = args.save_root {
            self.world.save_root = root.clone();
        }
        if let Some(rd) = args.render_distance {
            self.render.render_distance = rd;
        }
        if let Some(r) = args.load_radius {
            self.streaming.load_radius = r;
        }
        if let Some(r) = args.unload_radius {
            self.streaming.unload_radius = r;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        self.sanitize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            world: Some("canyon".to_string()),
            load_radius: Some(2),
            render_distance: Some(64.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.name, "canyon");
        assert_eq!(config.streaming.load_radius, 2);
        assert_eq!(config.render.render_distance, 64.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.streaming.unload_radius, 5);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::try_parse_from([
            "strata",
            "--world",
            "mesa",
            "--ticks",
            "120",
            "--save-root",
            "/tmp/saves",
        ])
        .unwrap();
        assert_eq!(args.world.as_deref(), Some("mesa"));
        assert_eq!(args.ticks, Some(120));
        assert_eq!(args.save_root, Some(PathBuf::from("/tmp/saves")));
    }

    #[test]
    fn test_cli_rejected_value_is_sanitized() {
        let mut config = Config::default();
        let args = CliArgs {
            render_distance: Some(-1.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.render.render_distance, 50.0);
    }
}
