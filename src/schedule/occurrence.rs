// src/schedule/occurrence.rs

//! Next-occurrence arithmetic on local wall-clock time.
//!
//! All comparisons happen at minute precision: an announcement at `09:00` is
//! still "next" (immediately due) at `09:00:45`.

use chrono::{Datelike, NaiveDateTime, TimeDelta};

use crate::schedule::AnnouncementEntry;
use crate::types::ClockTime;

/// `now` with seconds and sub-seconds dropped.
pub fn minute_floor(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(ClockTime::of(now.time()).to_naive_time())
}

/// The earliest instant at or after the minute containing `now` at which
/// `entry` is due.
///
/// For each of the entry's weekdays the candidate is that weekday's date in
/// the current week (today or later) at `announcement_time`; a candidate that
/// is already behind `now` moves one week forward. The result is the minimum
/// over all weekdays.
pub fn next_occurrence(entry: &AnnouncementEntry, now: NaiveDateTime) -> NaiveDateTime {
    let floor = minute_floor(now);
    let today = floor.date();
    let today_idx = today.weekday().num_days_from_monday();
    let at = entry.announcement_time.to_naive_time();

    entry
        .days
        .iter()
        .map(|day| {
            let ahead = (day.num_days_from_monday() + 7 - today_idx) % 7;
            let candidate = (today + TimeDelta::days(i64::from(ahead))).and_time(at);
            if candidate < floor {
                candidate + TimeDelta::days(7)
            } else {
                candidate
            }
        })
        .min()
        // `days` is never empty for a constructed entry.
        .unwrap_or(floor + TimeDelta::days(7))
}

/// The first occurrence strictly after the minute containing `instant`.
pub fn next_occurrence_after(entry: &AnnouncementEntry, instant: NaiveDateTime) -> NaiveDateTime {
    next_occurrence(entry, minute_floor(instant) + TimeDelta::minutes(1))
}
