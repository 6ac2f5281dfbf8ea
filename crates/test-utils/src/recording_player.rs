use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use announcer::playback::{PlaybackJob, Player};

/// What the recording player saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayEvent {
    Started { event: String, at: tokio::time::Instant },
    Finished { event: String, at: tokio::time::Instant },
    Failed { event: String },
}

/// A fake player that:
/// - records start/finish of every job
/// - "plays" for a fixed duration on the Tokio clock (use a paused runtime
///   to make this instant)
/// - fails jobs whose event name is in the failing set.
#[derive(Debug, Clone)]
pub struct RecordingPlayer {
    duration: Duration,
    failing: HashSet<String>,
    events: Arc<Mutex<Vec<PlayEvent>>>,
}

impl RecordingPlayer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            failing: HashSet::new(),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing_on(mut self, event: &str) -> Self {
        self.failing.insert(event.to_string());
        self
    }

    /// Shared log; clone it before handing the player to a serializer.
    pub fn events(&self) -> Arc<Mutex<Vec<PlayEvent>>> {
        Arc::clone(&self.events)
    }
}

/// Event names of successfully finished jobs, in order.
pub fn finished(events: &Arc<Mutex<Vec<PlayEvent>>>) -> Vec<String> {
    events
        .lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            PlayEvent::Finished { event, .. } => Some(event.clone()),
            _ => None,
        })
        .collect()
}

impl Player for RecordingPlayer {
    fn play(
        &mut self,
        job: PlaybackJob,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + '_>> {
        let events = Arc::clone(&self.events);
        let duration = self.duration;
        let fail = self.failing.contains(&job.event_name);

        Box::pin(async move {
            events.lock().unwrap().push(PlayEvent::Started {
                event: job.event_name.clone(),
                at: tokio::time::Instant::now(),
            });

            tokio::time::sleep(duration).await;

            if fail {
                events.lock().unwrap().push(PlayEvent::Failed {
                    event: job.event_name.clone(),
                });
                anyhow::bail!("simulated playback failure for {}", job.audio);
            }

            events.lock().unwrap().push(PlayEvent::Finished {
                event: job.event_name,
                at: tokio::time::Instant::now(),
            });
            Ok(())
        })
    }
}
