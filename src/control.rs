use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Marker content written to the stop flag.
///
/// Existence of the flag is the actual signal; the content is a fixed
/// convention shared with the external recorder, which deletes the file
/// once it has reacted.
pub const STOP_TOKEN: &str = "stop";

/// Errors from the fallible inner control operations
///
/// These never cross the public `start`/`request_stop`/`force_stop`
/// boundary; they are caught there and reported as diagnostics.
#[derive(Debug, Error)]
pub enum ControlError {
    /// Spawning the recorder process failed
    #[error("failed to launch recorder `{command}`: {source}")]
    Launch {
        /// The launch invocation that failed
        command: String,
        /// Underlying spawn error
        source: std::io::Error,
    },

    /// Creating or overwriting the stop flag failed
    #[error("failed to write stop flag {path}: {source}")]
    StopFlag {
        /// Stop-flag path
        path: PathBuf,
        /// Underlying write error
        source: std::io::Error,
    },

    /// Enumerating candidate processes for the kill signal failed
    #[error("failed to signal processes matching `{pattern}`: {source}")]
    Signal {
        /// Command-line substring being matched
        pattern: String,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Launch invocation for the external recorder (interpreter + script)
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    /// Interpreter or executable to invoke
    pub interpreter: String,
    /// Script path passed as the single argument
    pub script: PathBuf,
}

impl LaunchSpec {
    fn display(&self) -> String {
        format!("{} {}", self.interpreter, self.script.display())
    }
}

/// Issues lifecycle commands to the external recorder process.
///
/// Deliberately keeps no handle or PID for the spawned process: `start`
/// launches unconditionally and `force_stop` matches by command line, so
/// nothing here guarantees at most one recorder instance is running.
pub struct ProcessController {
    launch: LaunchSpec,
    stop_flag: PathBuf,
    kill_pattern: String,
}

impl ProcessController {
    /// Creates a controller from a launch spec, stop-flag path, and the
    /// command-line substring used by [`Self::force_stop`]
    pub fn new(
        launch: LaunchSpec,
        stop_flag: impl Into<PathBuf>,
        kill_pattern: impl Into<String>,
    ) -> Self {
        Self {
            launch,
            stop_flag: stop_flag.into(),
            kill_pattern: kill_pattern.into(),
        }
    }

    /// Launches a new recorder instance as a detached background process.
    ///
    /// Does not check whether an instance is already running. Total from the
    /// caller's point of view: a spawn failure is logged, never propagated.
    pub fn start(&self) {
        if let Err(e) = self.try_start() {
            warn!("recorder launch failed: {e}");
        }
    }

    fn try_start(&self) -> Result<(), ControlError> {
        let child = Command::new(&self.launch.interpreter)
            .arg(&self.launch.script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ControlError::Launch {
                command: self.launch.display(),
                source,
            })?;

        info!(pid = child.id(), command = %self.launch.display(), "recorder launched");
        // The child handle is dropped on purpose: stop and kill go through
        // the flag file and the name pattern, not a tracked PID.
        drop(child);
        Ok(())
    }

    /// Requests graceful termination by creating the stop flag.
    ///
    /// Advisory: the contract ends at "flag exists with the expected
    /// content". Idempotent; a write failure is logged, never propagated.
    pub fn request_stop(&self) {
        if let Err(e) = self.try_request_stop() {
            warn!("stop request failed: {e}");
        }
    }

    fn try_request_stop(&self) -> Result<(), ControlError> {
        fs::write(&self.stop_flag, STOP_TOKEN).map_err(|source| ControlError::StopFlag {
            path: self.stop_flag.clone(),
            source,
        })?;
        info!(path = %self.stop_flag.display(), "stop flag set");
        Ok(())
    }

    /// Sends SIGTERM to every process whose command line contains the kill
    /// pattern.
    ///
    /// Best-effort: no verification that a match existed or terminated.
    /// A scan failure is logged, never propagated.
    pub fn force_stop(&self) {
        if let Err(e) = self.try_force_stop() {
            warn!("force stop failed: {e}");
        }
    }

    fn try_force_stop(&self) -> Result<(), ControlError> {
        let own_pid = std::process::id();
        let mut signaled = 0_usize;

        let entries = fs::read_dir("/proc").map_err(|source| ControlError::Signal {
            pattern: self.kill_pattern.clone(),
            source,
        })?;

        for entry in entries.filter_map(Result::ok) {
            let Some(pid) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<i32>().ok())
            else {
                continue;
            };
            if pid == own_pid as i32 {
                continue;
            }

            // Processes exit mid-scan; per-process read failures are skipped
            let Ok(cmdline) = fs::read(entry.path().join("cmdline")) else {
                continue;
            };
            if !cmdline_matches(&cmdline, &self.kill_pattern) {
                continue;
            }

            match nix::sys::signal::kill(
                nix::unistd::Pid::from_raw(pid),
                nix::sys::signal::Signal::SIGTERM,
            ) {
                Ok(()) => {
                    info!(pid, pattern = %self.kill_pattern, "sent SIGTERM to recorder process");
                    signaled += 1;
                }
                Err(e) => {
                    debug!(pid, "could not signal process: {}", e);
                }
            }
        }

        if signaled == 0 {
            debug!(pattern = %self.kill_pattern, "no matching recorder process");
        }
        Ok(())
    }
}

/// True if a `/proc/<pid>/cmdline` buffer contains the pattern (pure, testable)
///
/// Kernel threads have an empty cmdline and never match. The NUL separators
/// between argv entries are treated as spaces so patterns may span the
/// interpreter/script boundary.
fn cmdline_matches(cmdline: &[u8], pattern: &str) -> bool {
    if cmdline.is_empty() || pattern.is_empty() {
        return false;
    }
    String::from_utf8_lossy(cmdline)
        .replace('\0', " ")
        .contains(pattern)
}
