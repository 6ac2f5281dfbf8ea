// src/engine/runtime.rs

use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::clock::{Clock, Wake};
use crate::errors::Result;
use crate::playback::PlaybackQueue;

use super::core::TriggerCore;
use super::status::StatusReporter;
use super::{DueAnnouncement, EngineOptions, EnginePhase};

/// Drives the trigger core against a [`Clock`] and hands due announcements
/// to the playback queue.
///
/// This is the async IO shell around `TriggerCore`, which contains all the
/// timing semantics. This struct handles sleeping, shutdown and dispatch.
pub struct TriggerEngine<C: Clock> {
    core: TriggerCore,
    clock: C,
    playback: PlaybackQueue,
    options: EngineOptions,
    status: StatusReporter,
}

impl<C: Clock> fmt::Debug for TriggerEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerEngine")
            .field("core", &self.core)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C: Clock> TriggerEngine<C> {
    pub fn new(
        core: TriggerCore,
        clock: C,
        playback: PlaybackQueue,
        options: EngineOptions,
        status: StatusReporter,
    ) -> Self {
        Self {
            core,
            clock,
            playback,
            options,
            status,
        }
    }

    /// Main loop: compute the wait, sleep, check, dispatch, repeat.
    ///
    /// Returns when `shutdown` is cancelled. An in-flight playback is not
    /// touched; stopping the serializer is the caller's job.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<()> {
        info!(announcements = self.core.table().len(), "trigger engine started");
        self.status.update(|s| s.alive = true);

        loop {
            self.set_phase(EnginePhase::ComputingWait);
            let now = self.clock.now();
            let plan = self.core.plan_wake(now, &self.options);

            match plan.target {
                Some(upcoming) => {
                    if let Some(entry) = self.core.table().get(upcoming.entry) {
                        info!(
                            event = %entry.event_name,
                            audio = %entry.audio,
                            at = %upcoming.at.format("%Y-%m-%d %H:%M"),
                            "next scheduled announcement"
                        );
                    }
                }
                None => debug!("no announcements scheduled; idling"),
            }

            self.status.update(|s| {
                s.phase = EnginePhase::Sleeping;
                s.next_occurrence = plan.target.map(|u| u.at);
            });
            debug!(deadline = %plan.deadline, "sleeping until wake deadline");

            if self.clock.sleep_until(plan.deadline, shutdown.clone()).await == Wake::Cancelled {
                info!("shutdown requested; stopping trigger engine");
                break;
            }

            self.set_phase(EnginePhase::Checking);
            let now = self.clock.now();
            self.status.update(|s| s.last_check = Some(now));
            debug!(%now, "checking schedule");
            let due = self.core.check(now);

            if !due.is_empty() {
                self.set_phase(EnginePhase::Dispatching);
                self.dispatch(due);
            }
        }

        self.status.update(|s| {
            s.alive = false;
            s.phase = EnginePhase::Stopped;
        });
        info!("trigger engine exiting");
        Ok(())
    }

    fn set_phase(&self, phase: EnginePhase) {
        self.status.update(|s| s.phase = phase);
    }

    /// Enqueue every due announcement. Never waits for playback.
    fn dispatch(&self, due: Vec<DueAnnouncement>) {
        for announcement in due {
            match self
                .playback
                .enqueue(announcement.event_name.clone(), announcement.audio.clone())
            {
                Ok(seq) => {
                    self.status.update(|s| s.dispatched += 1);
                    debug!(
                        seq,
                        entry = %announcement.entry,
                        event = %announcement.event_name,
                        "announcement queued for playback"
                    );
                }
                Err(err) => {
                    error!(
                        entry = %announcement.entry,
                        event = %announcement.event_name,
                        error = %err,
                        "could not queue announcement"
                    );
                }
            }
        }
    }
}
