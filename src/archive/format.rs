//! Archive formats and the naming convention for distribution archives.
//!
//! Release tooling names an archive after the directory packed inside it:
//! `vdsm-4.50.1.tar.gz` unpacks to `vdsm-4.50.1/`. [`ArchiveName`] recovers
//! that directory name and the compression format from a file name.

use crate::error::{AuditError, Result};
use camino::Utf8Path;
use std::fmt;

/// A container/compression combination the lister can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// Gzip-compressed tar (`.tar.gz`, `.tgz`).
    TarGz,
    /// Zstandard-compressed tar (`.tar.zst`).
    TarZst,
    /// Uncompressed tar (`.tar`).
    Tar,
}

impl ArchiveFormat {
    /// Every supported format, in detection order.
    pub const ALL: [Self; 3] = [Self::TarGz, Self::TarZst, Self::Tar];

    /// File extensions recognised for this format, leading dot included.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::TarGz => &[".tar.gz", ".tgz"],
            Self::TarZst => &[".tar.zst"],
            Self::Tar => &[".tar"],
        }
    }

    /// Split a file name into its format and stem.
    ///
    /// # Examples
    ///
    /// ```
    /// use distcheck::archive::ArchiveFormat;
    ///
    /// assert_eq!(
    ///     ArchiveFormat::split_file_name("pkg-1.0.tar.gz"),
    ///     Some((ArchiveFormat::TarGz, "pkg-1.0"))
    /// );
    /// assert_eq!(ArchiveFormat::split_file_name("pkg-1.0.zip"), None);
    /// ```
    #[must_use]
    pub fn split_file_name(file_name: &str) -> Option<(Self, &str)> {
        Self::ALL.into_iter().find_map(|format| {
            format
                .extensions()
                .iter()
                .find_map(|ext| file_name.strip_suffix(ext))
                .filter(|stem| !stem.is_empty())
                .map(|stem| (format, stem))
        })
    }

    /// Comma-separated list of every supported extension, for diagnostics.
    #[must_use]
    pub fn supported_extensions() -> String {
        Self::ALL
            .iter()
            .flat_map(|format| format.extensions().iter().copied())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TarGz => "tar.gz",
            Self::TarZst => "tar.zst",
            Self::Tar => "tar",
        };
        f.write_str(name)
    }
}

/// A parsed distribution archive file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    format: ArchiveFormat,
    stem: String,
}

impl ArchiveName {
    /// Parse the final component of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnsupportedArchive`] if the path has no file
    /// name or the extension is not one of
    /// [`ArchiveFormat::supported_extensions`].
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use distcheck::archive::{ArchiveFormat, ArchiveName};
    ///
    /// let name = ArchiveName::from_path(Utf8Path::new("exported-artifacts/vdsm-4.50.1.tar.gz"))
    ///     .expect("supported archive");
    /// assert_eq!(name.top_dir(), "vdsm-4.50.1");
    /// assert_eq!(name.format(), ArchiveFormat::TarGz);
    /// ```
    pub fn from_path(path: &Utf8Path) -> Result<Self> {
        path.file_name()
            .and_then(ArchiveFormat::split_file_name)
            .map(|(format, stem)| Self {
                format,
                stem: stem.to_owned(),
            })
            .ok_or_else(|| AuditError::UnsupportedArchive {
                path: path.to_owned(),
                expected: ArchiveFormat::supported_extensions(),
            })
    }

    /// The compression format implied by the extension.
    #[must_use]
    pub const fn format(&self) -> ArchiveFormat {
        self.format
    }

    /// The file name without its archive extension, which by convention is
    /// the top-level directory packed inside the archive.
    #[must_use]
    pub fn top_dir(&self) -> &str {
        &self.stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::gzip("pkg-1.0.tar.gz", ArchiveFormat::TarGz, "pkg-1.0")]
    #[case::tgz("pkg-1.0.tgz", ArchiveFormat::TarGz, "pkg-1.0")]
    #[case::zstd("pkg-1.0.tar.zst", ArchiveFormat::TarZst, "pkg-1.0")]
    #[case::plain("pkg-1.0.tar", ArchiveFormat::Tar, "pkg-1.0")]
    #[case::dotted_version("vdsm-4.50.1.2.git3a1b.tar.gz", ArchiveFormat::TarGz, "vdsm-4.50.1.2.git3a1b")]
    fn split_recognises_supported_formats(
        #[case] file_name: &str,
        #[case] format: ArchiveFormat,
        #[case] stem: &str,
    ) {
        assert_eq!(ArchiveFormat::split_file_name(file_name), Some((format, stem)));
    }

    #[rstest]
    #[case::zip("pkg-1.0.zip")]
    #[case::bare_extension(".tar.gz")]
    #[case::rpm("vdsm-4.50.1-1.el9.src.rpm")]
    fn split_rejects_unsupported_names(#[case] file_name: &str) {
        assert_eq!(ArchiveFormat::split_file_name(file_name), None);
    }

    #[test]
    fn from_path_reports_supported_extensions() {
        let err = ArchiveName::from_path(Utf8Path::new("dist/pkg-1.0.zip"))
            .expect_err("zip is not supported");
        match err {
            AuditError::UnsupportedArchive { path, expected } => {
                assert_eq!(path, "dist/pkg-1.0.zip");
                assert_eq!(expected, ".tar.gz, .tgz, .tar.zst, .tar");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_path_uses_final_component() {
        let name = ArchiveName::from_path(Utf8Path::new("/build/out.d/pkg-2.3.tar.zst"))
            .expect("supported");
        assert_eq!(name.top_dir(), "pkg-2.3");
        assert_eq!(name.format().to_string(), "tar.zst");
    }
}
