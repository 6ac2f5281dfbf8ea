use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::Deserialize;

/// What the loader does with an announcement that fails validation.
///
/// - `Abort`: refuse to start (default).
/// - `Skip`: log a warning and leave the entry out of the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidEntryPolicy {
    Abort,
    Skip,
}

impl Default for InvalidEntryPolicy {
    fn default() -> Self {
        InvalidEntryPolicy::Abort
    }
}

impl FromStr for InvalidEntryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(InvalidEntryPolicy::Abort),
            "skip" => Ok(InvalidEntryPolicy::Skip),
            other => Err(format!(
                "invalid on_invalid_entry: {other} (expected \"abort\" or \"skip\")"
            )),
        }
    }
}

/// A wall-clock time with minute granularity, stored as minute-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(ClockTime((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// The minute containing `time` (seconds are dropped).
    pub fn of(time: NaiveTime) -> Self {
        ClockTime((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minute_of_day(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u32 {
        u32::from(self.0 / 60)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.0 % 60)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // hour < 24 and minute < 60 by construction.
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl FromStr for ClockTime {
    type Err = String;

    /// Parses 24-hour `HH:MM` (a single-digit hour is accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| format!("invalid time '{trimmed}' (expected HH:MM)"))?;

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(h) || h.len() > 2 || !all_digits(m) || m.len() != 2 {
            return Err(format!("invalid time '{trimmed}' (expected HH:MM)"));
        }

        let hour: u32 = h.parse().map_err(|_| format!("invalid hour in '{trimmed}'"))?;
        let minute: u32 = m
            .parse()
            .map_err(|_| format!("invalid minute in '{trimmed}'"))?;

        ClockTime::from_hm(hour, minute)
            .ok_or_else(|| format!("time '{trimmed}' is out of range (00:00..=23:59)"))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// A single `days = [...]` tag before expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayTag {
    Day(Weekday),
    Everyday,
}

impl FromStr for DayTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = match s.trim().to_lowercase().as_str() {
            "everyday" | "daily" => return Ok(DayTag::Everyday),
            "mon" | "monday" => Weekday::Mon,
            "tue" | "tuesday" => Weekday::Tue,
            "wed" | "wednesday" => Weekday::Wed,
            "thu" | "thursday" => Weekday::Thu,
            "fri" | "friday" => Weekday::Fri,
            "sat" | "saturday" => Weekday::Sat,
            "sun" | "sunday" => Weekday::Sun,
            other => {
                return Err(format!(
                    "unknown day '{other}' (expected mon..sun or \"everyday\")"
                ));
            }
        };
        Ok(DayTag::Day(tag))
    }
}

/// Canonical set of weekdays an announcement plays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EVERYDAY: WeekdaySet = WeekdaySet(0b111_1111);

    pub fn empty() -> Self {
        WeekdaySet(0)
    }

    fn bit(day: Weekday) -> u8 {
        1 << day.num_days_from_monday()
    }

    pub fn insert(&mut self, tag: DayTag) {
        match tag {
            DayTag::Day(day) => self.0 |= Self::bit(day),
            DayTag::Everyday => *self = Self::EVERYDAY,
        }
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Days in the set, Monday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        let mut day = Weekday::Mon;
        (0..7).filter_map(move |_| {
            let current = day;
            day = day.succ();
            self.contains(current).then_some(current)
        })
    }

    /// Parse and expand a list of raw day tags.
    pub fn parse_tags<S: AsRef<str>>(tags: &[S]) -> Result<Self, String> {
        let mut set = WeekdaySet::empty();
        for tag in tags {
            set.insert(tag.as_ref().parse()?);
        }
        if set.is_empty() {
            return Err("at least one day is required".to_string());
        }
        Ok(set)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(DayTag::Day(day));
        }
        set
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::EVERYDAY {
            return f.write_str("everyday");
        }
        let names: Vec<String> = self.iter().map(|d| d.to_string().to_lowercase()).collect();
        f.write_str(&names.join(","))
    }
}
