// src/engine/mod.rs

//! Trigger engine for announcer.
//!
//! This module ties together:
//! - the occurrence calculator (when is the next announcement?)
//! - the deduplicator (has this occurrence already fired today?)
//! - the runtime loop that sleeps, wakes, checks and hands due
//!   announcements to the playback serializer
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`]. [`status`] exposes a read-only liveness view.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::schedule::{AudioRef, EntryId};
use crate::types::ClockTime;

/// Phase of the engine loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Starting,
    ComputingWait,
    Sleeping,
    Checking,
    Dispatching,
    Stopped,
}

impl fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnginePhase::Starting => "starting",
            EnginePhase::ComputingWait => "computing-wait",
            EnginePhase::Sleeping => "sleeping",
            EnginePhase::Checking => "checking",
            EnginePhase::Dispatching => "dispatching",
            EnginePhase::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Timing knobs for the runtime loop.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Wake this long before an occurrence when there is room to.
    pub wake_lead: TimeDelta,
    /// Never sleep longer than this in one go.
    pub max_sleep: TimeDelta,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            wake_lead: TimeDelta::seconds(1),
            max_sleep: TimeDelta::hours(1),
        }
    }
}

/// The next occurrence the engine is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upcoming {
    pub entry: EntryId,
    pub at: NaiveDateTime,
}

/// An announcement found due during a check. Already recorded as fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueAnnouncement {
    pub entry: EntryId,
    pub event_name: String,
    pub audio: AudioRef,
    pub day: NaiveDate,
    pub minute: ClockTime,
}

pub mod core;
pub mod dedup;
pub mod runtime;
pub mod status;

pub use self::core::{TriggerCore, WakePlan};
pub use dedup::Deduplicator;
pub use runtime::TriggerEngine;
pub use status::{status_channel, EngineStatus, StatusHandle, StatusReporter};
