//! Tracing subscriber setup.
//!
//! Filter precedence: `RUST_LOG`, then `--log-level`, then `[logging] level`,
//! then [`DEFAULT_LEVEL`]. Output goes to stderr so command output on stdout
//! stays machine-readable.

use crate::ports::config_port::ConfigPort;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "warn";

/// Level directive to use when `RUST_LOG` is unset.
pub fn resolve_level(cli_level: Option<&str>, config: Option<&dyn ConfigPort>) -> String {
    cli_level
        .map(str::to_string)
        .or_else(|| config.and_then(|c| c.get_string("logging", "level")))
        .map(|level| level.trim().to_string())
        .filter(|level| !level.is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .compact()
        .with_env_filter(build_filter(level))
        .try_init();
}
