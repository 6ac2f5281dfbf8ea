// src/config/validate.rs

use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use tracing::{debug, warn};

use crate::config::model::{
    ConfigFile, ConfigSection, RawAnnouncement, RawConfigFile, Settings, SkippedEntry,
};
use crate::errors::{AnnouncerError, Result};
use crate::fs::FileSystem;
use crate::schedule::{AnnouncementEntry, AudioRef, ScheduleTable};
use crate::types::{ClockTime, InvalidEntryPolicy, WeekdaySet};

/// Validate a raw schedule file and build the immutable table.
///
/// `base_dir` is the directory of the schedule file; a relative
/// `audio_root` resolves against it. Audio files are existence-checked
/// through `fs`.
///
/// Global `[config]` problems always fail. A bad announcement fails the
/// whole load under `on_invalid_entry = "abort"` and is dropped with a
/// warning under `"skip"`.
pub fn validate_config(
    raw: RawConfigFile,
    base_dir: &Path,
    fs: &dyn FileSystem,
) -> Result<ConfigFile> {
    let settings = validate_global_config(&raw.config)?;
    let audio_root = resolve_audio_root(&raw.config, base_dir);
    debug!(audio_root = %audio_root.display(), "resolved audio root");

    let mut entries = Vec::with_capacity(raw.announcement.len());
    let mut skipped = Vec::new();

    for (index, announcement) in raw.announcement.iter().enumerate() {
        match validate_announcement(index, announcement, &audio_root, fs) {
            Ok(entry) => entries.push(entry),
            Err(err)
                if err.is_entry_error() && settings.on_invalid_entry == InvalidEntryPolicy::Skip =>
            {
                warn!(
                    entry = index,
                    event = %announcement.event_name,
                    error = %err,
                    "skipping invalid announcement"
                );
                skipped.push(SkippedEntry {
                    index,
                    reason: err.to_string(),
                });
            }
            Err(err) => return Err(err),
        }
    }

    if entries.is_empty() {
        warn!("schedule contains no announcements; the engine will idle");
    }

    Ok(ConfigFile {
        settings,
        table: ScheduleTable::new(entries),
        skipped,
    })
}

fn validate_global_config(cfg: &ConfigSection) -> Result<Settings> {
    let (program, args) = cfg
        .player
        .split_first()
        .ok_or_else(|| AnnouncerError::ConfigError("[config].player must not be empty".to_string()))?;

    if program.trim().is_empty() {
        return Err(AnnouncerError::ConfigError(
            "[config].player program name must not be blank".to_string(),
        ));
    }

    if cfg.wake_lead_ms >= 60_000 {
        return Err(AnnouncerError::ConfigError(format!(
            "[config].wake_lead_ms must be < 60000 (got {})",
            cfg.wake_lead_ms
        )));
    }

    if cfg.max_sleep_secs == 0 {
        return Err(AnnouncerError::ConfigError(
            "[config].max_sleep_secs must be >= 1 (got 0)".to_string(),
        ));
    }

    let wake_lead = TimeDelta::milliseconds(cfg.wake_lead_ms as i64);
    // Occurrences are never more than a week apart.
    let max_sleep = TimeDelta::seconds(cfg.max_sleep_secs.min(7 * 24 * 3_600) as i64);

    Ok(Settings {
        player_program: program.clone(),
        player_args: args.to_vec(),
        on_invalid_entry: cfg.on_invalid_entry,
        wake_lead,
        max_sleep,
    })
}

fn resolve_audio_root(cfg: &ConfigSection, base_dir: &Path) -> PathBuf {
    match &cfg.audio_root {
        Some(root) if root.is_absolute() => root.clone(),
        Some(root) => base_dir.join(root),
        None => base_dir.to_path_buf(),
    }
}

fn validate_announcement(
    index: usize,
    raw: &RawAnnouncement,
    audio_root: &Path,
    fs: &dyn FileSystem,
) -> Result<AnnouncementEntry> {
    let invalid = |reason: String| AnnouncerError::InvalidEntry {
        index,
        event: raw.event_name.clone(),
        reason,
    };

    if raw.event_name.trim().is_empty() {
        return Err(invalid("event_name must not be empty".to_string()));
    }

    let announcement_time: ClockTime = raw
        .announcement_time
        .parse()
        .map_err(|e| invalid(format!("announcement_time: {e}")))?;

    let event_time = raw
        .event_time
        .as_deref()
        .map(str::parse::<ClockTime>)
        .transpose()
        .map_err(|e| invalid(format!("event_time: {e}")))?;

    let days = WeekdaySet::parse_tags(&raw.days).map_err(|e| invalid(format!("days: {e}")))?;

    let audio_path = if raw.audio.is_absolute() {
        raw.audio.clone()
    } else {
        audio_root.join(&raw.audio)
    };

    if !fs.is_file(&audio_path) {
        return Err(AnnouncerError::AudioMissing {
            index,
            event: raw.event_name.clone(),
            path: audio_path,
        });
    }

    AnnouncementEntry::new(
        raw.event_name.trim(),
        event_time,
        announcement_time,
        days,
        AudioRef::new(audio_path),
    )
    .map_err(invalid)
}
