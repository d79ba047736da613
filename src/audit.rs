//! The distribution archive audit.
//!
//! [`Auditor::audit`] checks one archive against the tracked templates of a
//! repository. For every template whose generated file is not allow-listed,
//! `<top-dir>/<generated-file>` must be absent from the archive. A present
//! file is a leak and fails the audit.
//!
//! The audit is a single read-only pass: the archive is listed once into an
//! [`ArchiveManifest`] and each template costs one hash lookup. Running it
//! again on the same inputs produces the same report.

use crate::allow_list::AllowList;
use crate::archive::{ArchiveLister, ArchiveManifest, ArchiveName};
use crate::error::{AuditError, Result};
use crate::template::{LogicalPath, TemplateFile, TemplateSuffix};
use crate::tracked::TrackedFileSource;
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Whether the audit stops at the first leak or reports them all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first leaked file.
    #[default]
    FailFast,
    /// Check every template and report every leaked file.
    CollectAll,
}

/// How the archive's top-level directory is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopDirStrategy {
    /// Trust the naming convention: the archive file name minus its
    /// extension.
    #[default]
    FileName,
    /// Read the archive and require exactly one top-level directory.
    Inspect,
}

/// Tunables for an [`Auditor`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditOptions {
    /// Marker suffix that identifies templates.
    pub template_suffix: TemplateSuffix,
    /// Fail-fast or collect-all.
    pub failure_policy: FailurePolicy,
    /// How to find the archive's top-level directory.
    pub top_dir: TopDirStrategy,
}

/// The outcome of an audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No non-allow-listed generated file is in the archive.
    Pass,
    /// At least one generated file leaked into the archive.
    Fail {
        /// Leaked logical paths, in tracked-file order. Never empty.
        leaked: Vec<LogicalPath>,
    },
}

impl Verdict {
    /// Returns `true` for [`Verdict::Pass`].
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// The leaked paths; empty for [`Verdict::Pass`].
    #[must_use]
    pub fn leaked(&self) -> &[LogicalPath] {
        match self {
            Self::Pass => &[],
            Self::Fail { leaked } => leaked,
        }
    }

    /// Convert a failing verdict into an error so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::GeneratedFileLeaked`] naming the first leaked
    /// path when the verdict is [`Verdict::Fail`].
    ///
    /// # Examples
    ///
    /// ```
    /// use distcheck::audit::Verdict;
    /// use distcheck::template::LogicalPath;
    ///
    /// assert!(Verdict::Pass.into_result().is_ok());
    ///
    /// let fail = Verdict::Fail { leaked: vec![LogicalPath::from("config.py")] };
    /// let err = fail.into_result().expect_err("leak");
    /// assert!(err.to_string().contains("config.py"));
    /// ```
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Pass => Ok(()),
            Self::Fail { leaked } => {
                let mut paths = leaked.into_iter();
                let first = paths.next().map(|p| p.as_str().to_owned()).unwrap_or_default();
                Err(AuditError::GeneratedFileLeaked {
                    path: first,
                    others: paths.count(),
                })
            }
        }
    }
}

/// Everything learned from one audit run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    /// The archive that was audited.
    pub archive: Utf8PathBuf,
    /// The top-level directory member paths were qualified with.
    pub top_dir: String,
    /// Number of distinct archive members.
    pub members: usize,
    /// Number of templates checked against the archive.
    pub checked: usize,
    /// Templates skipped because their generated file is allow-listed.
    pub allowed: Vec<LogicalPath>,
    /// Allow-list entries that match no tracked template.
    pub stale_allow_entries: Vec<LogicalPath>,
    /// Pass or fail.
    pub verdict: Verdict,
}

/// Audits distribution archives through an injected [`ArchiveLister`].
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use distcheck::allow_list::AllowList;
/// use distcheck::archive::TarArchiveLister;
/// use distcheck::audit::{AuditOptions, Auditor};
///
/// let auditor = Auditor::new(&TarArchiveLister, AuditOptions::default());
/// let report = auditor.audit(
///     Utf8Path::new("exported-artifacts/vdsm-4.50.1.tar.gz"),
///     &["lib/vdsm/constants.py.in".to_owned()],
///     &AllowList::default(),
/// )?;
/// assert!(report.verdict.is_pass());
/// # Ok::<(), distcheck::error::AuditError>(())
/// ```
pub struct Auditor<'a> {
    lister: &'a dyn ArchiveLister,
    options: AuditOptions,
}

impl<'a> Auditor<'a> {
    /// Create an auditor that lists archives with `lister`.
    #[must_use]
    pub const fn new(lister: &'a dyn ArchiveLister, options: AuditOptions) -> Self {
        Self { lister, options }
    }

    /// The options this auditor runs with.
    #[must_use]
    pub const fn options(&self) -> &AuditOptions {
        &self.options
    }

    /// Query `source` for tracked templates, then [`audit`](Self::audit).
    ///
    /// # Errors
    ///
    /// Returns any error from the tracked-file query or from
    /// [`audit`](Self::audit).
    pub fn audit_source(
        &self,
        archive_path: &Utf8Path,
        source: &dyn TrackedFileSource,
        allow_list: &AllowList,
    ) -> Result<AuditReport> {
        ensure_archive_exists(archive_path)?;
        let tracked = source.tracked_files(&self.options.template_suffix.glob())?;
        self.audit(archive_path, &tracked, allow_list)
    }

    /// Audit `archive_path` against `tracked_template_files`.
    ///
    /// Entries of `tracked_template_files` that do not end in the template
    /// suffix are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::ArchiveNotFound`] if the archive does not exist,
    /// [`AuditError::UnsupportedArchive`] or [`AuditError::ArchiveUnreadable`]
    /// if it cannot be listed, and [`AuditError::TopLevelDirectory`] if the
    /// top-level directory cannot be determined. A leak is not an error: it
    /// is reported as [`Verdict::Fail`].
    pub fn audit(
        &self,
        archive_path: &Utf8Path,
        tracked_template_files: &[String],
        allow_list: &AllowList,
    ) -> Result<AuditReport> {
        ensure_archive_exists(archive_path)?;
        let name = ArchiveName::from_path(archive_path)?;
        let manifest = ArchiveManifest::from_members(self.lister.list(archive_path)?);
        let top_dir = self.resolve_top_dir(archive_path, &name, &manifest)?;

        let templates: Vec<TemplateFile> = tracked_template_files
            .iter()
            .filter_map(|path| TemplateFile::parse(path, &self.options.template_suffix))
            .collect();

        let mut checked = 0;
        let mut allowed = Vec::new();
        let mut leaked = Vec::new();

        for template in &templates {
            let logical = template.logical_path();
            if allow_list.contains(logical) {
                debug!("{} is allow-listed", template.source());
                allowed.push(logical.clone());
                continue;
            }

            checked += 1;
            if manifest.contains_qualified(&top_dir, logical) {
                warn!(
                    "{} (generated from {}) is present in {archive_path}",
                    logical.qualified(&top_dir),
                    template.source()
                );
                leaked.push(logical.clone());
                if self.options.failure_policy == FailurePolicy::FailFast {
                    break;
                }
            }
        }

        let stale_allow_entries = stale_entries(allow_list, &templates);
        for entry in &stale_allow_entries {
            warn!("allow-list entry {entry} matches no tracked template");
        }

        let verdict = if leaked.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail { leaked }
        };

        Ok(AuditReport {
            archive: archive_path.to_owned(),
            top_dir,
            members: manifest.len(),
            checked,
            allowed,
            stale_allow_entries,
            verdict,
        })
    }

    fn resolve_top_dir(
        &self,
        archive_path: &Utf8Path,
        name: &ArchiveName,
        manifest: &ArchiveManifest,
    ) -> Result<String> {
        let top_level = manifest.top_level_dirs();
        match self.options.top_dir {
            TopDirStrategy::FileName => {
                let derived = name.top_dir();
                if !manifest.is_empty() && !top_level.contains(derived) {
                    warn!(
                        "{archive_path} has no members under {derived}/; found {}",
                        top_level.into_iter().collect::<Vec<_>>().join(", ")
                    );
                }
                Ok(derived.to_owned())
            }
            TopDirStrategy::Inspect => {
                let mut dirs = top_level.into_iter();
                match (dirs.next(), dirs.next()) {
                    (Some(single), None) => Ok(single.to_owned()),
                    (None, _) => Err(AuditError::TopLevelDirectory {
                        path: archive_path.to_owned(),
                        reason: "archive is empty".to_owned(),
                    }),
                    (Some(first), Some(second)) => Err(AuditError::TopLevelDirectory {
                        path: archive_path.to_owned(),
                        reason: format!(
                            "expected one top-level directory, found {first}, {second}{}",
                            if dirs.next().is_some() { ", ..." } else { "" }
                        ),
                    }),
                }
            }
        }
    }
}

fn ensure_archive_exists(archive_path: &Utf8Path) -> Result<()> {
    if archive_path.is_file() {
        Ok(())
    } else {
        Err(AuditError::ArchiveNotFound {
            location: archive_path.to_string(),
        })
    }
}

fn stale_entries(allow_list: &AllowList, templates: &[TemplateFile]) -> Vec<LogicalPath> {
    allow_list
        .iter()
        .filter(|entry| {
            !templates
                .iter()
                .any(|template| template.logical_path() == *entry)
        })
        .cloned()
        .collect()
}
