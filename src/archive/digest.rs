//! SHA-256 digest of an archive file.
//!
//! The digest is included in JSON reports so a CI log ties a verdict to the
//! exact artefact that was audited.

use crate::error::{AuditError, Result};
use camino::Utf8Path;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns [`AuditError::ArchiveUnreadable`] if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> Result<String> {
    let unreadable = |source| AuditError::ArchiveUnreadable {
        path: path.to_owned(),
        source,
    };
    let mut file = File::open(path).map_err(unreadable)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(unreadable)?;
        let Some(chunk) = buffer.get(..bytes_read) else {
            break;
        };
        if chunk.is_empty() {
            break;
        }
        hasher.update(chunk);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
