// src/engine/status.rs

//! Read-only liveness view of the engine loop.
//!
//! The runtime publishes an [`EngineStatus`] snapshot on every phase change
//! through a `tokio::sync::watch` channel; any number of [`StatusHandle`]s can
//! observe it without touching engine state.

use chrono::NaiveDateTime;
use tokio::sync::watch;

use super::EnginePhase;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStatus {
    pub alive: bool,
    pub phase: EnginePhase,
    pub last_check: Option<NaiveDateTime>,
    pub next_occurrence: Option<NaiveDateTime>,
    /// Jobs handed to the playback serializer since start.
    pub dispatched: u64,
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self {
            alive: false,
            phase: EnginePhase::Starting,
            last_check: None,
            next_occurrence: None,
            dispatched: 0,
        }
    }
}

/// Writer side, owned by the runtime.
#[derive(Debug)]
pub struct StatusReporter {
    tx: watch::Sender<EngineStatus>,
}

impl StatusReporter {
    pub fn update(&self, f: impl FnOnce(&mut EngineStatus)) {
        // `send_modify` works without receivers, so a dropped handle is fine.
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> StatusHandle {
        StatusHandle {
            rx: self.tx.subscribe(),
        }
    }
}

/// Reader side.
#[derive(Debug, Clone)]
pub struct StatusHandle {
    rx: watch::Receiver<EngineStatus>,
}

impl StatusHandle {
    pub fn snapshot(&self) -> EngineStatus {
        self.rx.borrow().clone()
    }

    pub fn is_alive(&self) -> bool {
        self.rx.borrow().alive
    }

    /// Wait for the next published change. Returns `false` once the engine
    /// side is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

pub fn status_channel() -> (StatusReporter, StatusHandle) {
    let (tx, rx) = watch::channel(EngineStatus::default());
    (StatusReporter { tx }, StatusHandle { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_see_updates() {
        let (reporter, handle) = status_channel();
        assert!(!handle.is_alive());

        reporter.update(|s| {
            s.alive = true;
            s.phase = EnginePhase::Sleeping;
        });

        let other = reporter.subscribe();
        assert!(handle.is_alive());
        assert_eq!(other.snapshot().phase, EnginePhase::Sleeping);
    }

    #[tokio::test]
    async fn changed_reports_reporter_drop() {
        let (reporter, mut handle) = status_channel();
        drop(reporter);
        assert!(!handle.changed().await);
    }
}
