use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::control::{LaunchSpec, ProcessController};
use crate::poll::{DisplaySink, PollHandle};
use crate::status::{RecordingState, StatusObserver};

/// Front end over the status observer and process controller.
///
/// Owns the display binding and the poll-handle lifetime: constructed from
/// config, polling registered via [`Self::enable`] and torn down via
/// [`Self::disable`]. One instance per host; no process-wide state.
pub struct Indicator {
    observer: StatusObserver,
    controller: ProcessController,
    poll_interval: Duration,
    poll: Option<PollHandle>,
}

impl Indicator {
    /// Builds an indicator from the loaded configuration
    ///
    /// # Errors
    /// Returns error if a configured path cannot be expanded
    pub fn new(config: &Config) -> Result<Self> {
        let status_file = Config::expand_path(&config.paths.status_file)?;
        let stop_flag = Config::expand_path(&config.paths.stop_flag)?;
        let script = Config::expand_path(&config.recorder.script)?;

        let launch = LaunchSpec {
            interpreter: config.recorder.interpreter.clone(),
            script,
        };

        Ok(Self {
            observer: StatusObserver::new(status_file),
            controller: ProcessController::new(
                launch,
                stop_flag,
                config.recorder.kill_pattern.clone(),
            ),
            // tokio::time::interval panics on a zero period
            poll_interval: Duration::from_millis(config.poll.interval_ms.max(1)),
            poll: None,
        })
    }

    /// Current recorder state (see [`StatusObserver::query`])
    #[must_use]
    pub fn query(&self) -> RecordingState {
        self.observer.query()
    }

    /// Launches a new recorder instance (see [`ProcessController::start`])
    pub fn start(&self) {
        self.controller.start();
    }

    /// Requests graceful recorder shutdown via the stop flag
    pub fn request_stop(&self) {
        self.controller.request_stop();
    }

    /// Kills recorder processes by command-line pattern
    pub fn force_stop(&self) {
        self.controller.force_stop();
    }

    /// Registers the periodic poll, pushing each observed state into `sink`.
    ///
    /// Replaces any previous registration. Must be called from within a
    /// tokio runtime.
    pub fn enable(&mut self, sink: Arc<dyn DisplaySink>) {
        self.disable();
        self.poll = Some(PollHandle::spawn(
            self.observer.clone(),
            sink,
            self.poll_interval,
        ));
    }

    /// Cancels the periodic poll. Idempotent.
    pub fn disable(&mut self) {
        if let Some(poll) = self.poll.take() {
            poll.cancel();
        }
    }

    /// True while a poll registration is live
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.poll.is_some()
    }
}

impl Drop for Indicator {
    fn drop(&mut self) {
        self.disable();
    }
}
