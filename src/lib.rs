//! Voice Typing Indicator - status observation and process control for an
//! external voice-typing recorder.
//!
//! The recorder broadcasts its state through a shared status file and
//! reacts to a stop-flag file; this library exports the modules that read
//! one side of that convention and drive the other.

/// Configuration management
pub mod config;
/// Recorder lifecycle commands (launch, stop flag, kill by pattern)
pub mod control;
/// Front-end controller owning the display binding and poll lifetime
pub mod indicator;
/// Cancelable periodic status polling
pub mod poll;
/// Status-file observation
pub mod status;
/// Telemetry and diagnostic logging
pub mod telemetry;
