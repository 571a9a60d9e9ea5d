use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::status::{RecordingState, StatusObserver};

/// Sink for periodic state updates (the display layer's seam)
///
/// Implementations must not block: updates are pushed from the poll tick,
/// which shares its thread with the host loop.
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink: Send + Sync {
    /// Receives the freshly observed state once per tick
    fn update(&self, state: RecordingState);
}

/// Handle to a running poll task.
///
/// Cancel to stop the ticks; dropping the handle cancels too. The external
/// recorder's lifecycle is unaffected either way.
pub struct PollHandle {
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Starts polling `observer` every `period`, pushing each result into
    /// `sink`.
    ///
    /// The first tick fires immediately so the display synchronizes without
    /// waiting a full period. Ticks skip rather than burst when the host
    /// loop stalls. Must be called from within a tokio runtime.
    pub fn spawn(observer: StatusObserver, sink: Arc<dyn DisplaySink>, period: Duration) -> Self {
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                sink.update(observer.query());
            }
        });
        Self { task }
    }

    /// Stops polling.
    ///
    /// Idempotent: canceling twice, or canceling a task that already ended,
    /// is a no-op.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
