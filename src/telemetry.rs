//! Tracing subscriber setup for the `vitrine` binary.

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogFormat;

/// Directive used when `RUST_LOG` is unset.
pub fn default_directive(configured: &str, verbose: bool) -> String {
    if verbose {
        "debug".to_string()
    } else {
        configured.to_string()
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `filter`.
pub fn init_tracing(format: LogFormat, filter: &str, verbose: bool) -> Result<()> {
    let directive = default_directive(filter, verbose);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let result = match format {
        LogFormat::Pretty => fmt().with_env_filter(env_filter).try_init(),
        LogFormat::Json => fmt().json().with_env_filter(env_filter).try_init(),
    };
    result.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
