//! Error types for the distribution archive audit.
//!
//! Every variant is fatal to the surrounding pipeline: the binary maps any
//! error to a non-zero exit status. Variants carry the path or command that
//! failed so the packaging configuration can be corrected without re-running
//! under a debugger.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while locating, listing, or auditing an archive.
#[derive(Debug, Error)]
pub enum AuditError {
    /// No distribution archive exists where one was expected.
    #[error("no distribution archive found: {location}")]
    ArchiveNotFound {
        /// The archive path or export-directory pattern that was searched.
        location: String,
    },

    /// More than one archive matched the export-directory pattern.
    #[error("multiple distribution archives match {pattern}: {}", .candidates.join(", "))]
    AmbiguousArchive {
        /// The pattern that matched more than once.
        pattern: String,
        /// File names of every match, sorted.
        candidates: Vec<String>,
    },

    /// Neither an archive path nor an export directory was supplied.
    #[error("no archive to audit; pass --archive or --export-dir (or set EXPORT_DIR)")]
    MissingArchiveSource,

    /// An export-directory lookup was requested without a product name.
    #[error("no product name to search for in {export_dir}; pass --product or set it in distcheck.toml")]
    MissingProduct {
        /// The export directory that would have been searched.
        export_dir: Utf8PathBuf,
    },

    /// The archive extension is not one this tool can decode.
    #[error("unsupported archive {path}; expected one of: {expected}")]
    UnsupportedArchive {
        /// Path of the rejected archive.
        path: Utf8PathBuf,
        /// Comma-separated list of accepted extensions.
        expected: String,
    },

    /// The archive exists but could not be opened, decoded, or listed.
    #[error("archive {path} is unreadable")]
    ArchiveUnreadable {
        /// Path of the archive.
        path: Utf8PathBuf,
        /// The underlying decoding or I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The archive's top-level directory could not be determined.
    #[error("cannot determine top-level directory of {path}: {reason}")]
    TopLevelDirectory {
        /// Path of the archive.
        path: Utf8PathBuf,
        /// Description of why derivation failed.
        reason: String,
    },

    /// A template-derived file that is not allow-listed was found in the archive.
    #[error("generated file {path} leaked into the distribution archive{}", others_suffix(.others))]
    GeneratedFileLeaked {
        /// The first offending logical path.
        path: String,
        /// How many further leaked paths were collected.
        others: usize,
    },

    /// A git query failed.
    #[error("git {operation} failed: {message}")]
    Git {
        /// The git operation that failed (`ls-files`).
        operation: &'static str,
        /// Captured standard error of the git process.
        message: String,
    },

    /// An external command ran past its timeout and was killed.
    #[error("{command} timed out after {seconds} seconds")]
    CommandTimeout {
        /// The command that was killed.
        command: String,
        /// The timeout that elapsed.
        seconds: u64,
    },

    /// The configuration file could not be read or parsed.
    #[error("invalid configuration at {path}: {reason}")]
    InvalidConfig {
        /// Path of the configuration file.
        path: Utf8PathBuf,
        /// Description of the read or parse failure.
        reason: String,
    },

    /// The template suffix is empty.
    #[error("template suffix must not be empty")]
    InvalidTemplateSuffix,

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn others_suffix(others: &usize) -> String {
    match *others {
        0 => String::new(),
        1 => " (and 1 other)".to_owned(),
        n => format!(" (and {n} others)"),
    }
}

/// Result type alias using [`AuditError`].
pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn archive_not_found_names_location() {
        let err = AuditError::ArchiveNotFound {
            location: "exported-artifacts/vdsm*.tar.gz".to_owned(),
        };
        assert!(err.to_string().contains("exported-artifacts/vdsm*.tar.gz"));
    }

    #[test]
    fn ambiguous_archive_lists_candidates() {
        let err = AuditError::AmbiguousArchive {
            pattern: "dist/pkg*".to_owned(),
            candidates: vec!["pkg-1.0.tar.gz".to_owned(), "pkg-1.1.tar.gz".to_owned()],
        };
        let msg = err.to_string();
        assert!(msg.contains("pkg-1.0.tar.gz, pkg-1.1.tar.gz"));
    }

    #[rstest]
    #[case::single(0, "generated file config.py leaked into the distribution archive")]
    #[case::one_more(1, "leaked into the distribution archive (and 1 other)")]
    #[case::several(3, "leaked into the distribution archive (and 3 others)")]
    fn generated_file_leaked_counts_others(#[case] others: usize, #[case] expected: &str) {
        let err = AuditError::GeneratedFileLeaked {
            path: "config.py".to_owned(),
            others,
        };
        assert!(err.to_string().contains(expected), "got: {err}");
    }

    #[test]
    fn archive_unreadable_preserves_source() {
        let err = AuditError::ArchiveUnreadable {
            path: Utf8PathBuf::from("pkg-1.0.tar.gz"),
            source: std::io::Error::other("corrupt deflate stream"),
        };
        assert!(err.to_string().contains("pkg-1.0.tar.gz"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn git_error_includes_operation_and_message() {
        let err = AuditError::Git {
            operation: "ls-files",
            message: "not a git repository".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ls-files"));
        assert!(msg.contains("not a git repository"));
    }
}
