// src/playback/mod.rs

//! Audio playback layer.
//!
//! The trigger engine never plays audio itself. It enqueues
//! [`PlaybackJob`]s on a [`PlaybackQueue`]; a single worker owned by the
//! [`PlaybackSerializer`] plays them strictly one at a time, in enqueue order,
//! through a [`Player`].
//!
//! - [`backend`] provides the `Player` trait and the production
//!   `CommandPlayer`, which runs an external media player process. Tests
//!   substitute their own implementation.
//! - [`serializer`] owns the queue and the worker task.

use crate::schedule::AudioRef;

pub mod backend;
pub mod serializer;

pub use backend::{CommandPlayer, Player};
pub use serializer::{PlaybackQueue, PlaybackSerializer};

/// One requested playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackJob {
    /// Enqueue order, starting at 0.
    pub seq: u64,
    pub event_name: String,
    pub audio: AudioRef,
}

/// Counters reported when the worker stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub played: u64,
    pub failed: u64,
    /// Jobs still queued when a shutdown stopped the worker.
    pub dropped: u64,
}
