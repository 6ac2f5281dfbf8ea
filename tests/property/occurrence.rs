use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Weekday};
use proptest::prelude::*;

use announcer::schedule::{
    minute_floor, next_occurrence, next_occurrence_after, AnnouncementEntry, AudioRef,
};
use announcer::types::{ClockTime, WeekdaySet};

// Any instant in 2023..2026, to the second.
fn instant_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..3 * 366 * 86_400).prop_map(|secs| {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|base| base + TimeDelta::seconds(secs))
            .unwrap()
    })
}

// Non-empty day set plus an announcement time.
fn entry_strategy() -> impl Strategy<Value = AnnouncementEntry> {
    (1u8..128, 0u32..24, 0u32..60).prop_map(|(mask, h, m)| {
        let days: WeekdaySet = (0..7)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| Weekday::try_from(i as u8).unwrap())
            .collect();
        AnnouncementEntry::new(
            "prop",
            None,
            ClockTime::from_hm(h, m).unwrap(),
            days,
            AudioRef::new("/audio/prop.wav"),
        )
        .unwrap()
    })
}

proptest! {
    #[test]
    fn next_is_a_matching_instant_within_a_week(
        entry in entry_strategy(),
        now in instant_strategy(),
    ) {
        let next = next_occurrence(&entry, now);
        let floor = minute_floor(now);

        prop_assert!(next >= floor);
        prop_assert!(next < floor + TimeDelta::days(7));
        prop_assert!(entry.days.contains(next.weekday()));
        prop_assert_eq!(ClockTime::of(next.time()), entry.announcement_time);
        prop_assert_eq!(next.second(), 0);
    }

    #[test]
    fn nothing_matches_between_now_and_next(
        entry in entry_strategy(),
        now in instant_strategy(),
    ) {
        let next = next_occurrence(&entry, now);
        // Walk day by day from today; the first matching slot at or after
        // the current minute must be `next`.
        let floor = minute_floor(now);
        let at = entry.announcement_time.to_naive_time();
        let first = (0..8)
            .map(|d| (floor.date() + TimeDelta::days(d)).and_time(at))
            .find(|c| *c >= floor && entry.days.contains(c.weekday()));
        prop_assert_eq!(Some(next), first);
    }

    #[test]
    fn an_occurrence_instant_is_its_own_next(
        entry in entry_strategy(),
        now in instant_strategy(),
        secs in 0u32..60,
    ) {
        let occurrence = next_occurrence(&entry, now);
        let within_minute = occurrence + TimeDelta::seconds(i64::from(secs));
        prop_assert_eq!(next_occurrence(&entry, within_minute), occurrence);
    }

    #[test]
    fn after_skips_the_current_occurrence(
        entry in entry_strategy(),
        now in instant_strategy(),
    ) {
        let occurrence = next_occurrence(&entry, now);
        let following = next_occurrence_after(&entry, occurrence);

        prop_assert!(following > occurrence);
        prop_assert!(following <= occurrence + TimeDelta::days(7));
        if entry.days == WeekdaySet::EVERYDAY {
            prop_assert_eq!(following, occurrence + TimeDelta::days(1));
        }
    }
}
