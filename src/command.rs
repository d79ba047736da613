//! Running external tools with a timeout.
//!
//! Version-control queries go through [`CommandExecutor`] so that tests can
//! substitute canned output for a real `git` process.

use crate::error::{AuditError, Result};
use camino::Utf8Path;
use std::process::{Command, Output, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default timeout for external commands (5 minutes).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(300);

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs `cmd` with `args`, optionally inside `working_dir`, and returns
    /// the captured output.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Io`] if the command cannot be spawned, or
    /// [`AuditError::CommandTimeout`] if it runs past the executor's limit.
    fn run(&self, cmd: &str, args: &[&str], working_dir: Option<&Utf8Path>) -> Result<Output>;
}

/// Executes commands on the host system, killing them after a timeout.
///
/// # Examples
///
/// ```no_run
/// use distcheck::command::{CommandExecutor, SystemCommandExecutor};
///
/// let executor = SystemCommandExecutor::default();
/// let output = executor.run("git", &["--version"], None)?;
/// assert!(output.status.success());
/// # Ok::<(), distcheck::error::AuditError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemCommandExecutor {
    timeout: Duration,
}

impl SystemCommandExecutor {
    /// Create an executor that kills commands after `timeout`.
    #[must_use]
    pub const fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemCommandExecutor {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str], working_dir: Option<&Utf8Path>) -> Result<Output> {
        let mut command = Command::new(cmd);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = working_dir {
            command.current_dir(dir.as_std_path());
        }

        let mut child = command.spawn()?;

        // Drain both pipes on helper threads so a chatty child cannot block
        // on a full pipe while we wait on it.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let Some(status) = child.wait_timeout(self.timeout)? else {
            // Best-effort cleanup; the timeout error is what matters.
            if child.kill().is_err() {
                log::debug!("failed to kill timed-out {cmd}");
            }
            if child.wait().is_err() {
                log::debug!("failed to reap timed-out {cmd}");
            }
            return Err(AuditError::CommandTimeout {
                command: format!("{cmd} {}", args.join(" ")),
                seconds: self.timeout.as_secs(),
            });
        };

        Ok(Output {
            status,
            stdout: join_reader(stdout_reader)?,
            stderr: join_reader(stderr_reader)?,
        })
    }
}

type ReaderHandle = std::thread::JoinHandle<std::io::Result<Vec<u8>>>;

fn spawn_reader<R: std::io::Read + Send + 'static>(mut pipe: R) -> ReaderHandle {
    std::thread::spawn(move || {
        let mut buffer = Vec::new();
        pipe.read_to_end(&mut buffer)?;
        Ok(buffer)
    })
}

fn join_reader(handle: Option<ReaderHandle>) -> Result<Vec<u8>> {
    let Some(reader) = handle else {
        return Ok(Vec::new());
    };
    let bytes = reader
        .join()
        .map_err(|_| std::io::Error::other("output reader thread panicked"))??;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_five_minutes() {
        assert_eq!(
            SystemCommandExecutor::default().timeout(),
            Duration::from_secs(300)
        );
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_and_status() {
        let executor = SystemCommandExecutor::default();
        let output = executor
            .run("sh", &["-c", "printf 'a\\0b'; exit 3"], None)
            .expect("run sh");
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stdout, b"a\0b");
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_working_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let utf8 = camino::Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8");
        std::fs::write(dir.path().join("marker"), b"").expect("write");

        let output = SystemCommandExecutor::default()
            .run("ls", &[], Some(&utf8))
            .expect("run ls");
        assert!(String::from_utf8_lossy(&output.stdout).contains("marker"));
    }

    #[cfg(unix)]
    #[test]
    fn kills_commands_that_overrun() {
        let executor = SystemCommandExecutor::with_timeout(Duration::from_millis(100));
        let err = executor
            .run("sleep", &["5"], None)
            .expect_err("sleep should time out");
        assert!(
            matches!(err, AuditError::CommandTimeout { ref command, .. } if command == "sleep 5"),
            "got: {err}"
        );
    }

    #[test]
    fn missing_binary_is_an_io_error() {
        let err = SystemCommandExecutor::default()
            .run("distcheck-no-such-binary", &[], None)
            .expect_err("spawn should fail");
        assert!(matches!(err, AuditError::Io(_)));
    }
}
