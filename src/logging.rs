// src/logging.rs

//! `tracing` subscriber setup.
//!
//! The filter comes from `--log-level` when given, otherwise from
//! `ANNOUNCER_LOG` (any `EnvFilter` directive, e.g. `announcer::engine=debug`),
//! otherwise `info`. Output goes to stderr so `--dry-run` can own stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::LogLevel;

pub const LOG_ENV: &str = "ANNOUNCER_LOG";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(cli_level, std::env::var(LOG_ENV).ok().as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(level.as_directive());
    }
    env.and_then(|directives| EnvFilter::try_new(directives.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
