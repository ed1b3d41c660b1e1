//! Structured logging for strata.
//!
//! Every library crate emits `tracing` events; this crate installs the
//! subscriber once at startup. The console gets a human-readable stream with
//! uptime and targets, and debug builds can additionally write JSON lines to
//! `strata.log` for post-mortem analysis.

use std::fs::File;
use std::path::Path;

use strata_config::Config;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::fmt::time::Uptime;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// The JSON file layer type.
pub type JsonFileLayer<S> = fmt::Layer<S, JsonFields, Format<Json, Uptime>, File>;

/// Name of the JSON log file inside the log directory.
pub const LOG_FILE: &str = "strata.log";

const DEFAULT_DIRECTIVE: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file (debug builds only)
/// * `debug_build` - enables the file layer
/// * `config` - supplies `debug.log_level` when `RUST_LOG` is unset
///
/// ```no_run
/// use strata_config::Config;
/// use strata_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(file_layer) = json_file_layer(log_dir)
    {
        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Filter directive from config, or `info` when absent or blank.
pub fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|c| c.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_DIRECTIVE)
        .to_string()
}

/// `EnvFilter` with the default directive.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVE)
}

/// JSON layer writing to `log_dir/strata.log`, or `None` if the file
/// cannot be created.
pub fn json_file_layer<S>(log_dir: &Path) -> Option<JsonFileLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    std::fs::create_dir_all(log_dir).ok()?;
    let log_file = File::create(log_dir.join(LOG_FILE)).ok()?;
    Some(
        fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
