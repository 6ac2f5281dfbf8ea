// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnnouncerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid announcement #{index} ('{event}'): {reason}")]
    InvalidEntry {
        index: usize,
        event: String,
        reason: String,
    },

    #[error("Audio file for announcement #{index} ('{event}') not found: {}", .path.display())]
    AudioMissing {
        index: usize,
        event: String,
        path: PathBuf,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Playback queue is closed")]
    QueueClosed,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AnnouncerError {
    /// True for errors that describe a single bad announcement entry, as
    /// opposed to a broken file or global section.
    pub fn is_entry_error(&self) -> bool {
        matches!(
            self,
            AnnouncerError::InvalidEntry { .. } | AnnouncerError::AudioMissing { .. }
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AnnouncerError>;
