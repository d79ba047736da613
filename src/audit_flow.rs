//! Audit command implementation.
//!
//! Wires the parsed `audit` arguments, the configuration file, and the
//! production capabilities together, then renders the report.

use camino::Utf8PathBuf;
use log::info;
use std::io::Write;

use crate::archive::digest::compute_sha256;
use crate::archive::{ArchiveLister, TarArchiveLister};
use crate::audit::{AuditReport, Auditor, FailurePolicy, TopDirStrategy, Verdict};
use crate::cli::AuditArgs;
use crate::command::SystemCommandExecutor;
use crate::config::AuditConfig;
use crate::error::{AuditError, Result};
use crate::locate::locate_archive;
use crate::report::{format_human, format_json};
use crate::tracked::{GitTrackedFiles, StaticTrackedFiles};

/// Runs an audit and writes the report.
///
/// The report goes to `stdout` (human-readable by default, JSON with
/// `--json`). A failing verdict also writes one `leaked generated file:
/// <path>` line per leak to `stderr`.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration file is invalid
/// - No archive can be resolved from the arguments
/// - The archive cannot be listed or the tracked-file query fails
/// - Writing the report fails
///
/// A leak is not an error; it is returned as [`Verdict::Fail`].
pub fn run_audit(
    args: &AuditArgs,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<Verdict> {
    run_audit_with(args, &TarArchiveLister, stdout, stderr)
}

/// Internal implementation with an injectable lister for testability.
fn run_audit_with(
    args: &AuditArgs,
    lister: &dyn ArchiveLister,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<Verdict> {
    let config = resolve_config(args)?;
    let archive = resolve_archive(args, &config)?;
    let auditor = Auditor::new(lister, config.audit_options()?);

    let report = if args.tracked_file.is_empty() {
        let executor = SystemCommandExecutor::with_timeout(config.command_timeout());
        let source = GitTrackedFiles::new(&executor, &args.repo);
        auditor.audit_source(&archive, &source, &config.allow)?
    } else {
        let source = StaticTrackedFiles::new(args.tracked_file.iter().cloned());
        auditor.audit_source(&archive, &source, &config.allow)?
    };

    write_report(&report, args.json, stdout)?;

    for path in report.verdict.leaked() {
        writeln!(stderr, "leaked generated file: {path}")
            .map_err(|source| AuditError::WriteFailed { source })?;
    }

    info!(
        "audited {} ({} templates checked): {}",
        report.archive,
        report.checked,
        if report.verdict.is_pass() { "pass" } else { "fail" }
    );
    Ok(report.verdict)
}

/// Load the configuration file and apply command-line overrides.
///
/// # Errors
///
/// Returns [`AuditError::InvalidConfig`] if an explicit `--config` file is
/// missing, or if any configuration file is invalid.
pub fn resolve_config(args: &AuditArgs) -> Result<AuditConfig> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::load(path)?,
        None => AuditConfig::discover(&args.repo)?,
    };

    if let Some(product) = &args.product {
        config.product = Some(product.clone());
    }
    if let Some(suffix) = &args.template_suffix {
        config.template_suffix = suffix.clone();
    }
    if args.collect_all {
        config.failure_policy = FailurePolicy::CollectAll;
    }
    if args.inspect_top_dir {
        config.top_dir = TopDirStrategy::Inspect;
    }
    config.allow.extend(args.allow.iter().map(String::as_str));

    Ok(config)
}

/// Determine which archive to audit.
///
/// `--archive` wins; otherwise the product's archive is located in the export
/// directory.
///
/// # Errors
///
/// Returns [`AuditError::MissingArchiveSource`] if neither an archive nor an
/// export directory is given, [`AuditError::MissingProduct`] if the export
/// directory is given without a product name, or any error from
/// [`locate_archive`].
pub fn resolve_archive(args: &AuditArgs, config: &AuditConfig) -> Result<Utf8PathBuf> {
    if let Some(archive) = &args.archive {
        return Ok(archive.clone());
    }
    let export_dir = args
        .export_dir
        .as_deref()
        .ok_or(AuditError::MissingArchiveSource)?;
    let product = config
        .product
        .as_deref()
        .ok_or_else(|| AuditError::MissingProduct {
            export_dir: export_dir.to_owned(),
        })?;
    locate_archive(export_dir, product)
}

fn write_report(report: &AuditReport, json: bool, stdout: &mut dyn Write) -> Result<()> {
    let digest = compute_sha256(&report.archive)?;
    let output = if json {
        format_json(report, &digest)
    } else {
        format_human(report, &digest)
    };
    writeln!(stdout, "{output}").map_err(|source| AuditError::WriteFailed { source })
}
