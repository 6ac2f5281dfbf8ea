use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use announcer::clock::{Clock, Wake};
use chrono::{NaiveDateTime, TimeDelta};
use tokio_util::sync::CancellationToken;

/// Synthetic clock for driving the engine loop in tests.
///
/// - `sleep_until` jumps "now" straight to the deadline (plus an optional
///   wake delay to simulate OS jitter) instead of waiting.
/// - A deadline past `horizon` cancels the token and reports
///   `Wake::Cancelled`, which ends the engine loop.
/// - Every requested deadline and every actual wake is recorded.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<State>>,
}

#[derive(Debug)]
struct State {
    now: NaiveDateTime,
    horizon: NaiveDateTime,
    wake_delay: TimeDelta,
    deadlines: Vec<NaiveDateTime>,
    wakes: Vec<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime, horizon: NaiveDateTime) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                now: start,
                horizon,
                wake_delay: TimeDelta::zero(),
                deadlines: Vec::new(),
                wakes: Vec::new(),
            })),
        }
    }

    /// Every wake lands this much after its deadline.
    pub fn with_wake_delay(self, delay: TimeDelta) -> Self {
        self.inner.lock().unwrap().wake_delay = delay;
        self
    }

    pub fn set(&self, now: NaiveDateTime) {
        self.inner.lock().unwrap().now = now;
    }

    pub fn deadlines(&self) -> Vec<NaiveDateTime> {
        self.inner.lock().unwrap().deadlines.clone()
    }

    pub fn wakes(&self) -> Vec<NaiveDateTime> {
        self.inner.lock().unwrap().wakes.clone()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.inner.lock().unwrap().now
    }

    fn sleep_until(
        &self,
        deadline: NaiveDateTime,
        cancel: CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Wake> + Send + '_>> {
        let inner = Arc::clone(&self.inner);
        Box::pin(async move {
            // Give other tasks (the playback worker) a chance to run.
            tokio::task::yield_now().await;

            if cancel.is_cancelled() {
                return Wake::Cancelled;
            }

            let mut state = inner.lock().unwrap();
            state.deadlines.push(deadline);
            if deadline > state.horizon {
                cancel.cancel();
                return Wake::Cancelled;
            }

            let woke = deadline.max(state.now) + state.wake_delay;
            state.now = woke;
            state.wakes.push(woke);
            Wake::Elapsed
        })
    }
}
