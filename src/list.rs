//! List command implementation.
//!
//! Prints the normalised members of an archive, which is the view the audit
//! checks against. Useful when an audit result is surprising.

use log::trace;
use std::io::Write;

use crate::archive::{ArchiveLister, ArchiveManifest, TarArchiveLister};
use crate::cli::ListArgs;
use crate::error::{AuditError, Result};
use crate::report::{format_listing_human, format_listing_json};

/// Lists the members of an archive.
///
/// Output is written to stdout (one member per line by default, JSON with
/// `--json`).
///
/// # Errors
///
/// Returns an error if:
/// - The archive does not exist or cannot be listed
/// - Writing to stdout fails
pub fn run_list(args: &ListArgs, stdout: &mut dyn Write) -> Result<()> {
    run_list_with(args, &TarArchiveLister, stdout)
}

fn run_list_with(args: &ListArgs, lister: &dyn ArchiveLister, stdout: &mut dyn Write) -> Result<()> {
    if !args.archive.is_file() {
        return Err(AuditError::ArchiveNotFound {
            location: args.archive.to_string(),
        });
    }

    let manifest = ArchiveManifest::from_members(lister.list(&args.archive)?);
    trace!("{} has {} members", args.archive, manifest.len());

    let output = if args.json {
        format_listing_json(args.archive.as_str(), &manifest)
    } else {
        format_listing_human(&manifest)
    };

    writeln!(stdout, "{output}").map_err(|source| AuditError::WriteFailed { source })
}
