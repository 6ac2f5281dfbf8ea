// src/config/mod.rs

//! Schedule file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a schedule file through the [`FileSystem`](crate::fs::FileSystem)
//!   abstraction (`loader.rs`).
//! - Turn raw announcements into a validated
//!   [`ScheduleTable`](crate::schedule::ScheduleTable) (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_schedule};
pub use model::{ConfigFile, ConfigSection, RawAnnouncement, RawConfigFile, Settings, SkippedEntry};
pub use validate::validate_config;
