#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use announcer::schedule::{AnnouncementEntry, AudioRef, ScheduleTable};
use announcer::types::{ClockTime, WeekdaySet};

/// Builder for `ScheduleTable` to simplify test setup.
pub struct ScheduleBuilder {
    entries: Vec<AnnouncementEntry>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn with(mut self, entry: AnnouncementEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn build(self) -> ScheduleTable {
        ScheduleTable::new(self.entries)
    }

    pub fn build_shared(self) -> Arc<ScheduleTable> {
        Arc::new(self.build())
    }
}

impl Default for ScheduleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `AnnouncementEntry`.
///
/// Defaults: plays every day; the audio path is `/audio/<name>.wav`.
pub struct EntryBuilder {
    name: String,
    event_time: Option<ClockTime>,
    time: ClockTime,
    days: Vec<String>,
    audio: Option<AudioRef>,
}

impl EntryBuilder {
    pub fn new(name: &str, time: &str) -> Self {
        Self {
            name: name.to_string(),
            event_time: None,
            time: time.parse().expect("valid HH:MM in test"),
            days: Vec::new(),
            audio: None,
        }
    }

    pub fn on(mut self, day: &str) -> Self {
        self.days.push(day.to_string());
        self
    }

    pub fn event_time(mut self, time: &str) -> Self {
        self.event_time = Some(time.parse().expect("valid HH:MM in test"));
        self
    }

    pub fn audio(mut self, path: &str) -> Self {
        self.audio = Some(AudioRef::new(path));
        self
    }

    pub fn build(self) -> AnnouncementEntry {
        let days = if self.days.is_empty() {
            WeekdaySet::EVERYDAY
        } else {
            WeekdaySet::parse_tags(&self.days).expect("valid day tags in test")
        };
        let audio = self
            .audio
            .unwrap_or_else(|| AudioRef::new(format!("/audio/{}.wav", self.name)));
        AnnouncementEntry::new(self.name, self.event_time, self.time, days, audio)
            .expect("valid entry in test")
    }
}

/// `2024-01-<day> hh:mm:ss`. 2024-01-01 is a Monday.
pub fn jan_2024(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .and_then(|d| d.and_hms_opt(h, m, s))
        .expect("valid test timestamp")
}
