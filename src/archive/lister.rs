//! Listing the members of a distribution archive.
//!
//! Listing walks tar headers without unpacking anything, so auditing a
//! release archive never writes to disk.

use super::format::{ArchiveFormat, ArchiveName};
use crate::error::{AuditError, Result};
use camino::Utf8Path;
use log::trace;
use std::fs::File;
use std::io::{BufReader, Read};
use tar::EntryType;

/// Capability for enumerating the member paths of an archive.
///
/// The auditor receives this as a dependency so that tests can supply
/// fixture member lists without building archives on disk.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveLister {
    /// Return every member path of the archive at `archive_path`, in
    /// archive order, exactly as recorded in the headers.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnsupportedArchive`] if the format cannot be
    /// determined, or [`AuditError::ArchiveUnreadable`] if the archive cannot
    /// be opened or decoded.
    fn list(&self, archive_path: &Utf8Path) -> Result<Vec<String>>;
}

/// Default lister backed by the `tar`, `flate2`, and `zstd` crates.
///
/// The compression format is chosen from the file extension.
///
/// # Examples
///
/// ```no_run
/// use camino::Utf8Path;
/// use distcheck::archive::{ArchiveLister, TarArchiveLister};
///
/// let members = TarArchiveLister.list(Utf8Path::new("exported-artifacts/vdsm-4.50.1.tar.gz"))?;
/// assert!(!members.is_empty());
/// # Ok::<(), distcheck::error::AuditError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TarArchiveLister;

impl ArchiveLister for TarArchiveLister {
    fn list(&self, archive_path: &Utf8Path) -> Result<Vec<String>> {
        let format = ArchiveName::from_path(archive_path)?.format();
        let unreadable = |source: std::io::Error| AuditError::ArchiveUnreadable {
            path: archive_path.to_owned(),
            source,
        };

        let file = BufReader::new(File::open(archive_path).map_err(unreadable)?);
        let members = match format {
            ArchiveFormat::TarGz => read_members(flate2::read::GzDecoder::new(file)),
            ArchiveFormat::TarZst => zstd::Decoder::with_buffer(file).and_then(read_members),
            ArchiveFormat::Tar => read_members(file),
        }
        .map_err(unreadable)?;

        trace!("listed {} members from {archive_path} ({format})", members.len());
        Ok(members)
    }
}

/// Walk tar headers and collect member paths, skipping pax metadata records.
///
/// Directory entries always end in `/`.
fn read_members<R: Read>(reader: R) -> std::io::Result<Vec<String>> {
    let mut archive = tar::Archive::new(reader);
    let mut members = Vec::new();

    for entry_result in archive.entries()? {
        let entry = entry_result?;
        let entry_type = entry.header().entry_type();
        if matches!(entry_type, EntryType::XGlobalHeader | EntryType::XHeader) {
            continue;
        }
        let mut member = entry.path()?.to_string_lossy().into_owned();
        if entry_type.is_dir() && !member.ends_with('/') {
            member.push('/');
        }
        members.push(member);
    }

    Ok(members)
}
