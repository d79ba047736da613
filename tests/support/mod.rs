//! Test support utilities for distcheck behavioural tests.
//!
//! Builds real gzip-compressed tar archives in temporary directories so the
//! scenarios exercise the production lister end to end.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs::File;
use tempfile::TempDir;

/// A temporary directory addressed by a UTF-8 path.
pub struct Scratch {
    _temp: TempDir,
    pub root: Utf8PathBuf,
}

impl Scratch {
    /// Create an empty scratch directory.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        Self { _temp: temp, root }
    }
}

/// Split a comma-separated step argument into trimmed, non-empty items.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Write a `.tar.gz` archive at `path` holding `members`.
///
/// Members ending in `/` become directory entries; everything else becomes a
/// small regular file.
pub fn write_tar_gz(path: &Utf8Path, members: &[String]) {
    let file = File::create(path).expect("create archive");
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    for member in members {
        let mut header = tar::Header::new_gnu();
        if member.ends_with('/') {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_size(0);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, member, std::io::empty())
                .expect("append directory");
        } else {
            let contents = format!("# {member}\n");
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, member, contents.as_bytes())
                .expect("append file");
        }
    }

    let encoder = builder.into_inner().expect("tar finish");
    encoder.finish().expect("gzip finish");
}
