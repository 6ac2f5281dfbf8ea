// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::config::validate::validate_config;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::schedule::ScheduleTable;

/// Load a schedule file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate times,
/// days or audio files. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>, fs: &dyn FileSystem) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs.read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a schedule file from path and run full validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Parses times and day tags, resolves audio paths and checks that every
///   audio file exists.
pub fn load_and_validate(path: impl AsRef<Path>, fs: &dyn FileSystem) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw = load_from_path(path, fs)?;
    let cfg = validate_config(raw, &config_dir(path), fs)?;

    info!(
        path = %path.display(),
        announcements = cfg.table.len(),
        skipped = cfg.skipped.len(),
        "schedule loaded"
    );

    Ok(cfg)
}

/// Convenience for callers that only need the table.
pub fn load_schedule(path: impl AsRef<Path>, fs: &dyn FileSystem) -> Result<ScheduleTable> {
    Ok(load_and_validate(path, fs)?.table)
}

/// Helper to resolve a default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Announcer.toml")
}

/// Directory relative paths in the schedule file resolve against.
///
/// A bare filename like "Announcer.toml" has an empty parent; fall back to
/// the current working directory.
fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}
