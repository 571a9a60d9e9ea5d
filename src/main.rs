use std::sync::{Arc, Mutex};

use anyhow::Result;

use voice_typing_indicator::config::Config;
use voice_typing_indicator::indicator::Indicator;
use voice_typing_indicator::poll::DisplaySink;
use voice_typing_indicator::status::RecordingState;
use voice_typing_indicator::telemetry;

/// Display sink that logs state transitions.
///
/// The poll pushes every tick; only changes are worth a log line.
#[derive(Default)]
struct LogSink {
    last: Mutex<Option<RecordingState>>,
}

impl DisplaySink for LogSink {
    fn update(&self, state: RecordingState) {
        let Ok(mut last) = self.last.lock() else {
            return;
        };
        if *last != Some(state) {
            tracing::info!(?state, "recorder state changed");
            *last = Some(state);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    telemetry::init(&config.telemetry)?;
    tracing::info!("voice-typing-indicator starting");

    let mut indicator = Indicator::new(&config)?;
    indicator.enable(Arc::new(LogSink::default()));
    tracing::info!(
        interval_ms = config.poll.interval_ms,
        "status polling enabled (press Ctrl+C to exit)"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    indicator.disable();

    Ok(())
}
