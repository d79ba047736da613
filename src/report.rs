//! Output formatting for audit reports and archive listings.
//!
//! Both commands render either human-readable text or pretty-printed JSON for
//! scripting.

use serde::Serialize;

use crate::archive::ArchiveManifest;
use crate::audit::{AuditReport, Verdict};
use crate::template::LogicalPath;

/// Format an audit report for human-readable output.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use distcheck::audit::{AuditReport, Verdict};
/// use distcheck::report::format_human;
///
/// let report = AuditReport {
///     archive: Utf8PathBuf::from("vdsm-4.50.1.tar.gz"),
///     top_dir: "vdsm-4.50.1".to_owned(),
///     members: 3,
///     checked: 2,
///     allowed: Vec::new(),
///     stale_allow_entries: Vec::new(),
///     verdict: Verdict::Pass,
/// };
/// let output = format_human(&report, "e3b0c442");
/// assert!(output.contains("Result: PASS"));
/// ```
#[must_use]
pub fn format_human(report: &AuditReport, archive_sha256: &str) -> String {
    let mut output = format!("Audited {}\n", report.archive);
    output.push_str(&format!("  SHA-256: {archive_sha256}\n"));
    output.push_str(&format!("  Top-level directory: {}\n", report.top_dir));
    output.push_str(&format!("  Members: {}\n", report.members));
    output.push_str(&format!("  Templates checked: {}\n", report.checked));

    push_path_section(&mut output, "Allow-listed", &report.allowed);
    push_path_section(
        &mut output,
        "Stale allow-list entries",
        &report.stale_allow_entries,
    );

    match &report.verdict {
        Verdict::Pass => output.push_str("Result: PASS"),
        Verdict::Fail { leaked } => {
            output.push_str(&format!("Result: FAIL ({} leaked)", leaked.len()));
            for path in leaked {
                output.push_str(&format!("\n  - {path}"));
            }
        }
    }

    output
}

fn push_path_section(output: &mut String, title: &str, paths: &[LogicalPath]) {
    if paths.is_empty() {
        return;
    }
    output.push_str(&format!("  {title}: {}\n", paths.len()));
    for path in paths {
        output.push_str(&format!("    - {path}\n"));
    }
}

/// Format an audit report as JSON.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use distcheck::audit::{AuditReport, Verdict};
/// use distcheck::report::format_json;
///
/// let report = AuditReport {
///     archive: Utf8PathBuf::from("vdsm-4.50.1.tar.gz"),
///     top_dir: "vdsm-4.50.1".to_owned(),
///     members: 0,
///     checked: 0,
///     allowed: Vec::new(),
///     stale_allow_entries: Vec::new(),
///     verdict: Verdict::Pass,
/// };
/// let json = format_json(&report, "e3b0c442");
/// assert!(json.contains("\"verdict\": \"pass\""));
/// ```
#[must_use]
pub fn format_json(report: &AuditReport, archive_sha256: &str) -> String {
    let json_data = AuditReportJson::from_report(report, archive_sha256);
    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON-serializable representation of an audit report.
#[derive(Debug, Serialize)]
pub struct AuditReportJson<'a> {
    /// Path of the audited archive.
    pub archive: &'a str,
    /// Lowercase hex SHA-256 of the archive.
    pub archive_sha256: &'a str,
    /// Top-level directory used to qualify member paths.
    pub top_dir: &'a str,
    /// Number of archive members.
    pub members: usize,
    /// Number of templates checked.
    pub checked: usize,
    /// Allow-listed generated files that were skipped.
    pub allowed: &'a [LogicalPath],
    /// Allow-list entries matching no tracked template.
    pub stale_allow_entries: &'a [LogicalPath],
    /// `"pass"` or `"fail"`.
    pub verdict: &'static str,
    /// Leaked generated files; empty on pass.
    pub leaked: &'a [LogicalPath],
}

impl<'a> AuditReportJson<'a> {
    fn from_report(report: &'a AuditReport, archive_sha256: &'a str) -> Self {
        Self {
            archive: report.archive.as_str(),
            archive_sha256,
            top_dir: &report.top_dir,
            members: report.members,
            checked: report.checked,
            allowed: &report.allowed,
            stale_allow_entries: &report.stale_allow_entries,
            verdict: if report.verdict.is_pass() { "pass" } else { "fail" },
            leaked: report.verdict.leaked(),
        }
    }
}

/// Format archive members for human-readable output, one per line in sorted
/// order.
#[must_use]
pub fn format_listing_human(manifest: &ArchiveManifest) -> String {
    if manifest.is_empty() {
        return String::from("Archive is empty.");
    }
    manifest.sorted_members().join("\n")
}

/// Format archive members as JSON.
#[must_use]
pub fn format_listing_json(archive: &str, manifest: &ArchiveManifest) -> String {
    let json_data = ArchiveListingJson {
        archive,
        top_level_dirs: manifest.top_level_dirs().into_iter().collect(),
        members: manifest.sorted_members(),
    };
    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON-serializable representation of an archive listing.
#[derive(Debug, Serialize)]
pub struct ArchiveListingJson<'a> {
    /// Path of the listed archive.
    pub archive: &'a str,
    /// Distinct first path components.
    pub top_level_dirs: Vec<&'a str>,
    /// Normalised member paths, sorted.
    pub members: Vec<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn passing_report() -> AuditReport {
        AuditReport {
            archive: Utf8PathBuf::from("exported-artifacts/vdsm-4.50.1.tar.gz"),
            top_dir: "vdsm-4.50.1".to_owned(),
            members: 42,
            checked: 3,
            allowed: vec![LogicalPath::from("tests/run_tests.sh")],
            stale_allow_entries: Vec::new(),
            verdict: Verdict::Pass,
        }
    }

    fn failing_report() -> AuditReport {
        AuditReport {
            stale_allow_entries: vec![LogicalPath::from("tests/old_runner.sh")],
            verdict: Verdict::Fail {
                leaked: vec![
                    LogicalPath::from("config.py"),
                    LogicalPath::from("vdsm.spec"),
                ],
            },
            ..passing_report()
        }
    }

    #[rstest]
    fn human_pass_lists_summary(passing_report: AuditReport) {
        let output = format_human(&passing_report, "abc123");

        assert!(output.starts_with("Audited exported-artifacts/vdsm-4.50.1.tar.gz\n"));
        assert!(output.contains("SHA-256: abc123"));
        assert!(output.contains("Top-level directory: vdsm-4.50.1"));
        assert!(output.contains("Templates checked: 3"));
        assert!(output.contains("Allow-listed: 1\n    - tests/run_tests.sh"));
        assert!(!output.contains("Stale"));
        assert!(output.ends_with("Result: PASS"));
    }

    #[test]
    fn human_fail_lists_leaks_and_stale_entries() {
        let output = format_human(&failing_report(), "abc123");

        assert!(output.contains("Stale allow-list entries: 1\n    - tests/old_runner.sh"));
        assert!(output.contains("Result: FAIL (2 leaked)\n  - config.py\n  - vdsm.spec"));
    }

    #[rstest]
    #[case::pass(passing_report(), "pass", 0)]
    #[case::fail(failing_report(), "fail", 2)]
    fn json_carries_every_key(
        #[case] report: AuditReport,
        #[case] verdict: &str,
        #[case] leaked: usize,
    ) {
        let json = format_json(&report, "abc123");
        let value: Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["archive"], "exported-artifacts/vdsm-4.50.1.tar.gz");
        assert_eq!(value["archive_sha256"], "abc123");
        assert_eq!(value["top_dir"], "vdsm-4.50.1");
        assert_eq!(value["members"], 42);
        assert_eq!(value["checked"], 3);
        assert_eq!(value["allowed"][0], "tests/run_tests.sh");
        assert!(value["stale_allow_entries"].is_array());
        assert_eq!(value["verdict"], verdict);
        assert_eq!(value["leaked"].as_array().map(Vec::len), Some(leaked));
    }

    #[test]
    fn listing_is_sorted() {
        let manifest = ArchiveManifest::from_members(["pkg/b", "pkg/", "pkg/a"]);
        assert_eq!(format_listing_human(&manifest), "pkg\npkg/a\npkg/b");
    }

    #[test]
    fn empty_listing_says_so() {
        let manifest = ArchiveManifest::from_members(Vec::<String>::new());
        assert_eq!(format_listing_human(&manifest), "Archive is empty.");
    }

    #[test]
    fn listing_json_includes_top_level_dirs() {
        let manifest = ArchiveManifest::from_members(["pkg-1.0/setup.py", "pkg-1.0/README"]);
        let json = format_listing_json("pkg-1.0.tar.gz", &manifest);
        let value: Value = serde_json::from_str(&json).expect("valid JSON");

        assert_eq!(value["archive"], "pkg-1.0.tar.gz");
        assert_eq!(value["top_level_dirs"][0], "pkg-1.0");
        assert_eq!(value["members"][0], "pkg-1.0/README");
    }
}
