// src/schedule/mod.rs

//! The immutable announcement table the engine runs from.
//!
//! Entries reach this module already validated by [`crate::config`]; once a
//! [`ScheduleTable`] is built it is shared read-only (`Arc`) between the
//! engine loop and the CLI helpers.
//!
//! - [`occurrence`] computes the next concrete instant an entry is due.

pub mod occurrence;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::types::{ClockTime, WeekdaySet};

pub use occurrence::{minute_floor, next_occurrence, next_occurrence_after};

/// Position of an entry in its [`ScheduleTable`]; the entry's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub usize);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Resolved path of a playable audio file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioRef(PathBuf);

impl AudioRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AudioRef(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for AudioRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// One recurring weekly announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementEntry {
    pub event_name: String,
    /// When the announced event itself happens. Informational only.
    pub event_time: Option<ClockTime>,
    /// The instant the audio is played.
    pub announcement_time: ClockTime,
    pub days: WeekdaySet,
    pub audio: AudioRef,
}

impl AnnouncementEntry {
    /// Build an entry, enforcing the non-empty name and day set.
    pub fn new(
        event_name: impl Into<String>,
        event_time: Option<ClockTime>,
        announcement_time: ClockTime,
        days: WeekdaySet,
        audio: AudioRef,
    ) -> Result<Self, String> {
        let event_name = event_name.into();
        if event_name.trim().is_empty() {
            return Err("event_name must not be empty".to_string());
        }
        if days.is_empty() {
            return Err("at least one day is required".to_string());
        }
        Ok(Self {
            event_name,
            event_time,
            announcement_time,
            days,
            audio,
        })
    }
}

/// Validated, immutable collection of announcements in load order.
#[derive(Debug, Clone, Default)]
pub struct ScheduleTable {
    entries: Vec<AnnouncementEntry>,
}

impl ScheduleTable {
    pub fn new(entries: Vec<AnnouncementEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&AnnouncementEntry> {
        self.entries.get(id.0)
    }

    /// Entries with their identities, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &AnnouncementEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (EntryId(i), e))
    }

    /// First entry whose event name matches (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<(EntryId, &AnnouncementEntry)> {
        let wanted = name.trim().to_lowercase();
        self.iter()
            .find(|(_, e)| e.event_name.trim().to_lowercase() == wanted)
    }
}
