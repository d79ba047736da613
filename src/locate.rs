//! Locating the distribution archive in an export directory.
//!
//! The build stage drops exactly one `<product>*.tar.gz` (or another
//! supported format) into the export directory. Finding none means the build
//! silently failed; finding several means stale artefacts were left behind.
//! Both are errors rather than guesses.

use crate::archive::ArchiveFormat;
use crate::error::{AuditError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::ErrorKind;

/// Find the single archive for `product` in `export_dir`.
///
/// A candidate is a regular file (or a symlink to one) directly inside
/// `export_dir` whose name starts with `product` and ends in a supported
/// archive extension.
///
/// # Errors
///
/// Returns [`AuditError::ArchiveNotFound`] if the directory does not exist or
/// contains no candidate, [`AuditError::AmbiguousArchive`] if it contains
/// more than one, and [`AuditError::Io`] for other directory read failures.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use distcheck::locate::locate_archive;
///
/// let archive = locate_archive(Utf8Path::new("exported-artifacts"), "vdsm")?;
/// println!("auditing {archive}");
/// # Ok::<(), distcheck::error::AuditError>(())
/// ```
pub fn locate_archive(export_dir: &Utf8Path, product: &str) -> Result<Utf8PathBuf> {
    let pattern = format!("{export_dir}/{product}*{{{}}}", ArchiveFormat::supported_extensions());

    let entries = match export_dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(AuditError::ArchiveNotFound { location: pattern });
        }
        Err(err) => return Err(err.into()),
    };

    let mut candidates = Vec::new();
    for entry_result in entries {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                debug!("skipping entry with a non-UTF-8 name in {export_dir}: {err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        let name = entry.file_name();
        if !is_candidate(name, product) {
            continue;
        }
        if entry.path().is_file() {
            candidates.push(name.to_owned());
        } else {
            debug!("skipping non-file {name} in {export_dir}");
        }
    }
    candidates.sort();

    if candidates.len() > 1 {
        return Err(AuditError::AmbiguousArchive {
            pattern,
            candidates,
        });
    }

    candidates
        .pop()
        .map(|single| export_dir.join(single))
        .ok_or_else(|| AuditError::ArchiveNotFound { location: pattern })
}

fn is_candidate(file_name: &str, product: &str) -> bool {
    file_name.starts_with(product) && ArchiveFormat::split_file_name(file_name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    struct ExportDir {
        _temp: TempDir,
        path: Utf8PathBuf,
    }

    impl ExportDir {
        fn touch(&self, name: &str) {
            std::fs::write(self.path.join(name), b"").expect("write");
        }
    }

    #[fixture]
    fn export_dir() -> ExportDir {
        let temp = tempfile::tempdir().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        ExportDir { _temp: temp, path }
    }

    #[rstest]
    fn finds_single_archive(export_dir: ExportDir) {
        export_dir.touch("vdsm-4.50.1.tar.gz");
        export_dir.touch("vdsm-4.50.1-1.el9.src.rpm");
        export_dir.touch("ovirt-hosted-engine-setup-2.7.tar.gz");

        let found = locate_archive(&export_dir.path, "vdsm").expect("archive");
        assert_eq!(found, export_dir.path.join("vdsm-4.50.1.tar.gz"));
    }

    #[rstest]
    fn no_candidates_is_not_found(export_dir: ExportDir) {
        export_dir.touch("vdsm.spec");

        let err = locate_archive(&export_dir.path, "vdsm").expect_err("nothing to find");
        match err {
            AuditError::ArchiveNotFound { location } => {
                assert!(location.contains("vdsm*"), "location: {location}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn several_candidates_are_ambiguous(export_dir: ExportDir) {
        export_dir.touch("vdsm-4.50.2.tar.gz");
        export_dir.touch("vdsm-4.50.1.tar.gz");

        let err = locate_archive(&export_dir.path, "vdsm").expect_err("ambiguous");
        match err {
            AuditError::AmbiguousArchive { candidates, .. } => {
                assert_eq!(candidates, vec!["vdsm-4.50.1.tar.gz", "vdsm-4.50.2.tar.gz"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn directories_are_not_candidates(export_dir: ExportDir) {
        std::fs::create_dir(export_dir.path.join("vdsm-old.tar.gz")).expect("mkdir");
        export_dir.touch("vdsm-4.50.1.tar.zst");

        let found = locate_archive(&export_dir.path, "vdsm").expect("archive");
        assert_eq!(found.file_name(), Some("vdsm-4.50.1.tar.zst"));
    }

    #[cfg(target_os = "linux")]
    #[rstest]
    fn non_utf8_names_are_skipped(export_dir: ExportDir) {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let stray = export_dir
            .path
            .as_std_path()
            .join(OsStr::from_bytes(b"vdsm-\xff.tar.gz"));
        std::fs::write(stray, b"").expect("write stray file");
        export_dir.touch("vdsm-4.50.1.tar.gz");

        let found = locate_archive(&export_dir.path, "vdsm").expect("archive");
        assert_eq!(found, export_dir.path.join("vdsm-4.50.1.tar.gz"));
    }

    #[test]
    fn missing_export_dir_is_not_found() {
        let err = locate_archive(Utf8Path::new("/nonexistent/exported-artifacts"), "vdsm")
            .expect_err("missing dir");
        assert!(matches!(err, AuditError::ArchiveNotFound { .. }));
    }
}
