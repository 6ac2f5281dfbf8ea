// src/clock.rs

//! Wall-clock port.
//!
//! The engine never reads the system time or calls `tokio::time::sleep`
//! directly; it goes through a [`Clock`] so tests can drive it with synthetic
//! time. Times are local, timezone-naive wall-clock values, which is what the
//! schedule file speaks in.

use std::future::Future;
use std::pin::Pin;

use chrono::{Local, NaiveDateTime};
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// How a [`Clock::sleep_until`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The deadline was reached (or had already passed).
    Elapsed,
    /// The shutdown token fired first.
    Cancelled,
}

/// Source of "now" plus a sleep primitive that observes shutdown.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Suspend until `deadline` or until `cancel` fires, whichever is first.
    fn sleep_until(
        &self,
        deadline: NaiveDateTime,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Wake> + Send + '_>>;
}

/// Local system time, sleeping on the Tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep_until(
        &self,
        deadline: NaiveDateTime,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Wake> + Send + '_>> {
        // Negative means the deadline already passed; sleep zero.
        let remaining = (deadline - self.now()).to_std().unwrap_or_default();
        trace!(?remaining, %deadline, "sleeping");

        Box::pin(async move {
            if cancel.is_cancelled() {
                return Wake::Cancelled;
            }
            tokio::select! {
                _ = tokio::time::sleep(remaining) => Wake::Elapsed,
                _ = cancel.cancelled() => Wake::Cancelled,
            }
        })
    }
}
