//! Settings for every strata subsystem, persisted as `config.ron`.
//!
//! Each section is owned by the crate that consumes it; this crate only
//! gathers them, handles the file and applies command-line overrides.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, InteractionConfig, default_config_dir};
pub use error::ConfigError;
