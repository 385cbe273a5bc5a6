//! Per-session clock ticker.

use std::time::Duration;

use chrono::Utc;
use heartsh_app::AppEvent;
use tokio::{
    sync::mpsc::WeakUnboundedSender,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

/// Background task that enqueues a [`AppEvent::Tick`] every period.
///
/// The first tick fires one period after spawning. The task holds only a
/// weak handle to the session queue, so it never keeps a finished session
/// alive, and it is aborted when dropped.
#[derive(Debug)]
pub struct Ticker {
    task: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a ticker feeding `events` every `period`.
    pub fn spawn(events: WeakUnboundedSender<AppEvent>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                let Some(events) = events.upgrade() else { break };
                if events.send(AppEvent::Tick(Utc::now())).is_err() {
                    break;
                }
            }
        });

        Self { task }
    }

    /// Whether the task has exited on its own.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
