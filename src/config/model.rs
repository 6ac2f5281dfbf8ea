// src/config/model.rs

use std::path::PathBuf;

use chrono::TimeDelta;
use serde::Deserialize;

use crate::schedule::ScheduleTable;
use crate::types::InvalidEntryPolicy;

/// Top-level schedule file as read from TOML.
///
/// ```toml
/// [config]
/// audio_root = "recordings"
/// player = ["cvlc", "--play-and-exit", "--quiet"]
/// on_invalid_entry = "abort"
///
/// [[announcement]]
/// event_name = "Closing"
/// event_time = "17:00"
/// announcement_time = "16:55"
/// days = ["mon", "tue", "wed", "thu", "fri"]
/// audio = "500close.wav"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    /// All `[[announcement]]` tables, in file order.
    #[serde(default)]
    pub announcement: Vec<RawAnnouncement>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigSection {
    /// Directory relative `audio` paths resolve against. Itself relative to
    /// the schedule file's directory when not absolute.
    #[serde(default)]
    pub audio_root: Option<PathBuf>,

    /// Player program and leading arguments; the audio path is appended.
    #[serde(default = "default_player")]
    pub player: Vec<String>,

    #[serde(default)]
    pub on_invalid_entry: InvalidEntryPolicy,

    /// How long before an occurrence the engine wakes up.
    #[serde(default = "default_wake_lead_ms")]
    pub wake_lead_ms: u64,

    /// Upper bound on a single sleep; the engine re-plans after each wake.
    #[serde(default = "default_max_sleep_secs")]
    pub max_sleep_secs: u64,
}

fn default_player() -> Vec<String> {
    vec![
        "cvlc".to_string(),
        "--play-and-exit".to_string(),
        "--quiet".to_string(),
    ]
}

fn default_wake_lead_ms() -> u64 {
    1_000
}

fn default_max_sleep_secs() -> u64 {
    3_600
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            audio_root: None,
            player: default_player(),
            on_invalid_entry: InvalidEntryPolicy::default(),
            wake_lead_ms: default_wake_lead_ms(),
            max_sleep_secs: default_max_sleep_secs(),
        }
    }
}

/// One `[[announcement]]` table, unvalidated.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAnnouncement {
    pub event_name: String,

    #[serde(default)]
    pub event_time: Option<String>,

    /// 24-hour `HH:MM`.
    pub announcement_time: String,

    /// Weekday tags or `"everyday"`.
    pub days: Vec<String>,

    /// Audio file, absolute or relative to `audio_root`.
    pub audio: PathBuf,
}

/// Validated runtime settings derived from `[config]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub player_program: String,
    pub player_args: Vec<String>,
    pub on_invalid_entry: InvalidEntryPolicy,
    pub wake_lead: TimeDelta,
    pub max_sleep: TimeDelta,
}

/// A fully validated schedule file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub settings: Settings,
    pub table: ScheduleTable,
    /// Entries dropped under `on_invalid_entry = "skip"`.
    pub skipped: Vec<SkippedEntry>,
}

/// Record of an announcement left out of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub index: usize,
    pub reason: String,
}
