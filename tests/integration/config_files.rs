use std::fs;
use std::path::Path;

use tempfile::TempDir;

use announcer::config::{load_and_validate, load_schedule};
use announcer::errors::AnnouncerError;
use announcer::fs::RealFileSystem;
use announcer::types::{ClockTime, InvalidEntryPolicy, WeekdaySet};
use chrono::Weekday;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn workspace(schedule: &str, audio: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in audio {
        write(dir.path(), name, "RIFF");
    }
    write(dir.path(), "Announcer.toml", schedule);
    dir
}

#[test]
fn loads_a_realistic_schedule() {
    let dir = workspace(
        r#"
[config]
audio_root = "audio"
player = ["aplay", "-q"]

[[announcement]]
event_name = "Opening"
event_time = "09:00"
announcement_time = "08:55"
days = ["mon", "tue", "wed", "thu", "fri"]
audio = "open.wav"

[[announcement]]
event_name = "Lunch"
announcement_time = "12:00"
days = ["everyday"]
audio = "lunch.wav"
"#,
        &["audio/open.wav", "audio/lunch.wav"],
    );

    let cfg = load_and_validate(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap();

    assert_eq!(cfg.settings.player_program, "aplay");
    assert_eq!(cfg.settings.player_args, vec!["-q"]);
    assert_eq!(cfg.settings.on_invalid_entry, InvalidEntryPolicy::Abort);
    assert!(cfg.skipped.is_empty());

    let entries: Vec<_> = cfg.table.iter().map(|(_, e)| e.clone()).collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].announcement_time, ClockTime::from_hm(8, 55).unwrap());
    assert!(entries[0].days.contains(Weekday::Fri));
    assert!(!entries[0].days.contains(Weekday::Sat));
    assert_eq!(entries[1].days, WeekdaySet::EVERYDAY);
    assert_eq!(entries[1].audio.path(), dir.path().join("audio/lunch.wav"));
}

#[test]
fn unknown_day_tag_names_the_entry() {
    let dir = workspace(
        r#"
[[announcement]]
event_name = "Good"
announcement_time = "09:00"
days = ["mon"]
audio = "a.wav"

[[announcement]]
event_name = "Typo"
announcement_time = "10:00"
days = ["mon", "thurs"]
audio = "a.wav"
"#,
        &["a.wav"],
    );

    let err = load_schedule(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap_err();
    match err {
        AnnouncerError::InvalidEntry { index, event, reason } => {
            assert_eq!(index, 1);
            assert_eq!(event, "Typo");
            assert!(reason.contains("thurs"), "reason: {reason}");
        }
        other => panic!("expected InvalidEntry, got {other:?}"),
    }
}

#[test]
fn out_of_range_time_is_rejected() {
    let dir = workspace(
        r#"
[[announcement]]
event_name = "Late"
announcement_time = "24:00"
days = ["mon"]
audio = "a.wav"
"#,
        &["a.wav"],
    );

    let err = load_schedule(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap_err();
    assert!(matches!(err, AnnouncerError::InvalidEntry { index: 0, .. }));
}

#[test]
fn missing_audio_is_reported_with_its_path() {
    let dir = workspace(
        r#"
[[announcement]]
event_name = "Closing"
announcement_time = "16:55"
days = ["fri"]
audio = "close.wav"
"#,
        &[],
    );

    let err = load_schedule(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap_err();
    match err {
        AnnouncerError::AudioMissing { index, path, .. } => {
            assert_eq!(index, 0);
            assert_eq!(path, dir.path().join("close.wav"));
        }
        other => panic!("expected AudioMissing, got {other:?}"),
    }
}

#[test]
fn skip_policy_keeps_the_valid_entries() {
    let dir = workspace(
        r#"
[config]
on_invalid_entry = "skip"

[[announcement]]
event_name = "Missing"
announcement_time = "08:00"
days = ["mon"]
audio = "gone.wav"

[[announcement]]
event_name = "Kept"
announcement_time = "09:00"
days = ["sat", "sun"]
audio = "kept.wav"

[[announcement]]
event_name = "No days"
announcement_time = "10:00"
days = []
audio = "kept.wav"
"#,
        &["kept.wav"],
    );

    let cfg = load_and_validate(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap();
    assert_eq!(cfg.table.len(), 1);
    assert_eq!(
        cfg.table.find_by_name("kept").map(|(_, e)| e.event_name.as_str()),
        Some("Kept")
    );
    assert_eq!(
        cfg.skipped.iter().map(|s| s.index).collect::<Vec<_>>(),
        vec![0, 2]
    );
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = workspace("[[announcement]\nevent_name = ", &[]);
    let err = load_schedule(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap_err();
    assert!(matches!(err, AnnouncerError::TomlError(_)));
}

#[test]
fn missing_schedule_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_schedule(dir.path().join("Announcer.toml"), &RealFileSystem).unwrap_err();
    assert!(matches!(err, AnnouncerError::Other(_)));
}
