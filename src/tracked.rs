//! Sources of version-control-tracked file lists.
//!
//! The auditor only needs the tracked paths matching the template glob. The
//! production source asks `git`; tests and `--tracked-file` use a fixed list.

use crate::command::CommandExecutor;
use crate::error::{AuditError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;

/// Capability for listing tracked files that match a pathspec glob.
pub trait TrackedFileSource {
    /// Return tracked paths matching `pattern` (for example `*.in`), relative
    /// to the repository root.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying version-control query fails.
    fn tracked_files(&self, pattern: &str) -> Result<Vec<String>>;
}

/// Lists tracked files with `git ls-files`.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use distcheck::command::SystemCommandExecutor;
/// use distcheck::tracked::{GitTrackedFiles, TrackedFileSource};
///
/// let executor = SystemCommandExecutor::default();
/// let source = GitTrackedFiles::new(&executor, Utf8Path::new("."));
/// let templates = source.tracked_files("*.in")?;
/// # Ok::<(), distcheck::error::AuditError>(())
/// ```
pub struct GitTrackedFiles<'a> {
    executor: &'a dyn CommandExecutor,
    repo: Utf8PathBuf,
}

impl<'a> GitTrackedFiles<'a> {
    /// Create a source that queries the repository at `repo`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor, repo: &Utf8Path) -> Self {
        Self {
            executor,
            repo: repo.to_owned(),
        }
    }
}

impl TrackedFileSource for GitTrackedFiles<'_> {
    /// Queries the whole checkout even when `repo` is a subdirectory of it,
    /// and returns names relative to the top of the working tree.
    fn tracked_files(&self, pattern: &str) -> Result<Vec<String>> {
        let pathspec = format!(":(top){pattern}");
        let output = self.executor.run(
            "git",
            &["ls-files", "-z", "--full-name", "--", pathspec.as_str()],
            Some(&self.repo),
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuditError::Git {
                operation: "ls-files",
                message: stderr.trim().to_owned(),
            });
        }

        let files = parse_nul_separated(&output.stdout);
        debug!("git ls-files {pattern} in {} returned {} paths", self.repo, files.len());
        Ok(files)
    }
}

/// A fixed list of tracked paths.
///
/// # Examples
///
/// ```
/// use distcheck::tracked::{StaticTrackedFiles, TrackedFileSource};
///
/// let source = StaticTrackedFiles::new(["config.py.in", "README"]);
/// assert_eq!(source.tracked_files("*.in")?, vec!["config.py.in", "README"]);
/// # Ok::<(), distcheck::error::AuditError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticTrackedFiles(Vec<String>);

impl StaticTrackedFiles {
    /// Wrap a list of paths.
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl TrackedFileSource for StaticTrackedFiles {
    /// Returns every path regardless of `pattern`; the auditor filters by
    /// template suffix itself.
    fn tracked_files(&self, _pattern: &str) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

fn parse_nul_separated(stdout: &[u8]) -> Vec<String> {
    stdout
        .split(|byte| *byte == 0)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect()
}
