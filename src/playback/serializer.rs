// src/playback/serializer.rs

//! Single-worker playback queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::errors::{AnnouncerError, Result};
use crate::schedule::AudioRef;

use super::{PlaybackJob, PlaybackSummary, Player};

/// Producer handle for the playback queue.
///
/// Cheap to clone. `enqueue` never waits for playback.
#[derive(Debug, Clone)]
pub struct PlaybackQueue {
    tx: mpsc::UnboundedSender<PlaybackJob>,
    next_seq: Arc<AtomicU64>,
}

impl PlaybackQueue {
    /// Append a job and return its sequence number.
    ///
    /// Fails with [`AnnouncerError::QueueClosed`] once the worker has stopped.
    pub fn enqueue(&self, event_name: impl Into<String>, audio: AudioRef) -> Result<u64> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let job = PlaybackJob {
            seq,
            event_name: event_name.into(),
            audio,
        };
        self.tx.send(job).map_err(|_| AnnouncerError::QueueClosed)?;
        Ok(seq)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owns the playback worker.
///
/// Jobs play strictly one at a time in enqueue order. A failed job is logged
/// and skipped; the worker keeps going.
#[derive(Debug)]
pub struct PlaybackSerializer {
    queue: PlaybackQueue,
    stop: CancellationToken,
    worker: JoinHandle<PlaybackSummary>,
}

impl PlaybackSerializer {
    /// Spawn the worker on the current Tokio runtime.
    pub fn spawn<P: Player + 'static>(player: P) -> Self {
        let (tx, rx) = mpsc::unbounded_channel::<PlaybackJob>();
        let stop = CancellationToken::new();
        let worker = tokio::spawn(run_worker(player, rx, stop.clone()));

        Self {
            queue: PlaybackQueue {
                tx,
                next_seq: Arc::new(AtomicU64::new(0)),
            },
            stop,
            worker,
        }
    }

    pub fn queue(&self) -> PlaybackQueue {
        self.queue.clone()
    }

    /// Close the queue and play everything already in it.
    ///
    /// Completes once every other [`PlaybackQueue`] clone has been dropped
    /// too.
    pub async fn drain(self) -> Result<PlaybackSummary> {
        let Self { queue, worker, .. } = self;
        drop(queue);
        join_worker(worker).await
    }

    /// Let the job currently playing finish, drop the rest.
    pub async fn shutdown(self) -> Result<PlaybackSummary> {
        let Self {
            queue,
            stop,
            worker,
        } = self;
        stop.cancel();
        drop(queue);
        join_worker(worker).await
    }
}

async fn join_worker(worker: JoinHandle<PlaybackSummary>) -> Result<PlaybackSummary> {
    worker
        .await
        .map_err(|e| AnnouncerError::Other(anyhow::anyhow!("playback worker failed: {e}")))
}

async fn run_worker<P: Player>(
    mut player: P,
    mut rx: mpsc::UnboundedReceiver<PlaybackJob>,
    stop: CancellationToken,
) -> PlaybackSummary {
    info!("playback worker started");
    let mut summary = PlaybackSummary::default();

    loop {
        let job = tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            job = rx.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        let seq = job.seq;
        let event = job.event_name.clone();
        let audio = job.audio.clone();

        match player.play(job).await {
            Ok(()) => {
                summary.played += 1;
                info!(seq, event = %event, audio = %audio, "announcement played");
            }
            Err(err) => {
                summary.failed += 1;
                error!(
                    seq,
                    event = %event,
                    audio = %audio,
                    error = %err,
                    "playback failed; dropping job"
                );
            }
        }
    }

    rx.close();
    while let Ok(job) = rx.try_recv() {
        summary.dropped += 1;
        warn!(seq = job.seq, event = %job.event_name, "dropping queued announcement on shutdown");
    }

    info!(
        played = summary.played,
        failed = summary.failed,
        dropped = summary.dropped,
        "playback worker finished"
    );
    summary
}
