use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Top-level configuration, loaded from `~/.voice-typing-indicator.toml`
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Shared filesystem channels
    pub paths: PathsConfig,
    /// External recorder launch and kill settings
    pub recorder: RecorderConfig,
    /// Periodic status polling
    pub poll: PollConfig,
    /// Telemetry and logging
    pub telemetry: TelemetryConfig,
}

/// Paths of the two filesystem channels shared with the recorder
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Status file written by the recorder, read by this crate
    pub status_file: String,
    /// Stop flag written by this crate, consumed by the recorder
    pub stop_flag: String,
}

/// How to launch and kill the external recorder
#[derive(Debug, Deserialize, Clone)]
pub struct RecorderConfig {
    /// Interpreter or executable used to launch the recorder
    pub interpreter: String,
    /// Recorder script path (supports `~/` expansion)
    pub script: String,
    /// Command-line substring identifying recorder processes to kill
    pub kill_pattern: String,
}

/// Periodic poll settings
#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    /// Tick interval in milliseconds
    pub interval_ms: u64,
}

/// Telemetry settings
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    /// Write diagnostics to `log_path` instead of stdout
    pub enabled: bool,
    /// Log file location (supports `~/` expansion)
    pub log_path: String,
}

const DEFAULT_CONFIG: &str = r#"[paths]
status_file = "/tmp/voice_typing_status"
stop_flag = "/tmp/voice_typing_stop.flag"

[recorder]
interpreter = "python3"
script = "~/.voice-typing/voice_typing_toggle.py"
kill_pattern = "voice_typing_toggle.py"

[poll]
interval_ms = 1000

[telemetry]
enabled = false
log_path = "~/.voice-typing-indicator/indicator.log"
"#;

impl Config {
    /// Load config from `~/.voice-typing-indicator.toml`, creating the
    /// default file on first run
    ///
    /// # Errors
    /// Returns error if the file cannot be created, read, or parsed
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default(&config_path).context("failed to create default config")?;
        }

        let contents = fs::read_to_string(&config_path).context("failed to read config file")?;

        let config: Self = toml::from_str(&contents).context("failed to parse config TOML")?;

        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME").context("HOME environment variable not set")?;
        Ok(PathBuf::from(home).join(".voice-typing-indicator.toml"))
    }

    fn create_default(path: &PathBuf) -> Result<()> {
        fs::write(path, DEFAULT_CONFIG).context("failed to write default config")?;
        Ok(())
    }

    /// Expand `~/` in paths to the home directory
    ///
    /// # Errors
    /// Returns error if `HOME` is unset
    pub fn expand_path(path: &str) -> Result<PathBuf> {
        if let Some(stripped) = path.strip_prefix("~/") {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            Ok(PathBuf::from(home).join(stripped))
        } else {
            Ok(PathBuf::from(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.paths.status_file, "/tmp/voice_typing_status");
        assert_eq!(config.paths.stop_flag, "/tmp/voice_typing_stop.flag");
        assert_eq!(config.recorder.interpreter, "python3");
        assert_eq!(config.recorder.kill_pattern, "voice_typing_toggle.py");
        assert_eq!(config.poll.interval_ms, 1000);
        assert!(!config.telemetry.enabled);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let home = std::env::var("HOME").unwrap();
        let result = Config::expand_path("~/.voice-typing/recorder.py").unwrap();
        assert_eq!(
            result,
            PathBuf::from(home).join(".voice-typing/recorder.py")
        );
    }

    #[test]
    fn test_expand_path_absolute() {
        let result = Config::expand_path("/tmp/voice_typing_status").unwrap();
        assert_eq!(result, PathBuf::from("/tmp/voice_typing_status"));
    }
}
