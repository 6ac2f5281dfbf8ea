// src/engine/core.rs

//! Pure core of the trigger engine.
//!
//! [`TriggerCore`] answers the two questions the runtime loop asks:
//! - when should I wake up next? ([`TriggerCore::plan_wake`])
//! - what is due right now? ([`TriggerCore::check`])
//!
//! It owns the deduplicator and reads the schedule table. It has **no**
//! channels, no Tokio types, and never reads the clock itself; "now" is always
//! passed in, so every decision can be unit tested with fixed timestamps.

use std::sync::Arc;

use chrono::{Datelike, NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use crate::engine::dedup::Deduplicator;
use crate::engine::{DueAnnouncement, EngineOptions, Upcoming};
use crate::schedule::{minute_floor, next_occurrence, next_occurrence_after, ScheduleTable};
use crate::types::ClockTime;

/// Result of the `ComputingWait` phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WakePlan {
    /// When the runtime should wake up.
    pub deadline: NaiveDateTime,
    /// The occurrence being waited for; `None` for the idle heartbeat.
    pub target: Option<Upcoming>,
}

#[derive(Debug)]
pub struct TriggerCore {
    table: Arc<ScheduleTable>,
    fired: Deduplicator,
}

impl TriggerCore {
    pub fn new(table: Arc<ScheduleTable>) -> Self {
        Self {
            table,
            fired: Deduplicator::new(),
        }
    }

    pub fn table(&self) -> &ScheduleTable {
        &self.table
    }

    /// Expose the fired set (for tests and status).
    pub fn fired(&self) -> &Deduplicator {
        &self.fired
    }

    /// Earliest occurrence across the table that has not fired yet.
    ///
    /// An entry whose occurrence is the current minute and which already
    /// fired today contributes its following occurrence instead. Ties go to
    /// the entry earliest in the table.
    pub fn next_occurrence(&self, now: NaiveDateTime) -> Option<Upcoming> {
        let floor = minute_floor(now);
        let today = now.date();

        self.table
            .iter()
            .map(|(id, entry)| {
                let mut at = next_occurrence(entry, now);
                if at == floor && self.fired.has_fired(id, today) {
                    at = next_occurrence_after(entry, now);
                }
                Upcoming { entry: id, at }
            })
            .min_by_key(|upcoming| upcoming.at)
    }

    /// Decide how long to sleep.
    ///
    /// The wake lands `wake_lead` before the target when more than that
    /// remains, and exactly on the target otherwise, so a wake that came in
    /// early is followed by a short sleep onto the minute itself. An empty
    /// table waits one day. No sleep exceeds `max_sleep`.
    pub fn plan_wake(&self, now: NaiveDateTime, options: &EngineOptions) -> WakePlan {
        let target = self.next_occurrence(now);
        let instant = target
            .map(|upcoming| upcoming.at)
            .unwrap_or_else(|| now + TimeDelta::days(1));

        let mut deadline = if instant - now > options.wake_lead {
            instant - options.wake_lead
        } else {
            instant
        };
        if deadline - now > options.max_sleep {
            deadline = now + options.max_sleep;
        }

        WakePlan { deadline, target }
    }

    /// The `Checking` + `Dispatching` bookkeeping for one wake.
    ///
    /// Returns the entries due in the minute containing `now`, in table
    /// order, each already recorded in the deduplicator. Keys from earlier
    /// days are expired first.
    pub fn check(&mut self, now: NaiveDateTime) -> Vec<DueAnnouncement> {
        let today = now.date();
        let weekday = today.weekday();
        let minute = ClockTime::of(now.time());

        self.fired.expire(today);

        let mut due = Vec::new();
        for (id, entry) in self.table.iter() {
            if entry.announcement_time != minute || !entry.days.contains(weekday) {
                continue;
            }

            if !self.fired.mark_fired(id, today) {
                debug!(
                    entry = %id,
                    event = %entry.event_name,
                    %minute,
                    "announcement already played today"
                );
                continue;
            }

            info!(
                entry = %id,
                event = %entry.event_name,
                audio = %entry.audio,
                %minute,
                "announcement due"
            );
            due.push(DueAnnouncement {
                entry: id,
                event_name: entry.event_name.clone(),
                audio: entry.audio.clone(),
                day: today,
                minute,
            });
        }

        due
    }
}
