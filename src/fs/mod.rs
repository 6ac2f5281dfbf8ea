// src/fs/mod.rs

//! Filesystem port used by the schedule loader.
//!
//! Validation reads the schedule and checks that each audio file exists
//! through [`FileSystem`], so loader tests can run against
//! [`mock::MockFileSystem`] instead of real files.

use std::fmt::Debug;
use std::path::Path;

use anyhow::{Context, Result};

pub mod mock;

pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// True for anything at `path`, file or directory.
    fn exists(&self, path: &Path) -> bool;

    /// True only for a regular file (symlinks are followed).
    fn is_file(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading schedule file {}", path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}
