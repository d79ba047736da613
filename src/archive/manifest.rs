//! The set of member paths contained in an archive.

use crate::template::LogicalPath;
use std::collections::{BTreeSet, HashSet};

/// Every member path of an archive, normalised for lookups.
///
/// Member names are stored without a leading `./` or trailing `/`, so
/// `./pkg-1.0/lib/` and `pkg-1.0/lib` are the same member. A trailing `/`
/// marks a directory entry; directories are kept apart from files so that
/// only files can match a generated file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveManifest {
    files: HashSet<String>,
    directories: HashSet<String>,
}

impl ArchiveManifest {
    /// Build a manifest from raw member names as listed by the archiver.
    ///
    /// # Examples
    ///
    /// ```
    /// use distcheck::archive::ArchiveManifest;
    ///
    /// let manifest = ArchiveManifest::from_members(["./pkg-1.0/", "pkg-1.0/setup.py"]);
    /// assert!(manifest.contains("pkg-1.0"));
    /// assert!(manifest.contains("pkg-1.0/setup.py"));
    /// assert_eq!(manifest.len(), 2);
    /// ```
    #[must_use]
    pub fn from_members<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut manifest = Self::default();
        for member in members {
            let raw = member.as_ref();
            let Some(normalised) = normalise_member(raw) else {
                continue;
            };
            if raw.ends_with('/') {
                manifest.directories.insert(normalised);
            } else {
                manifest.files.insert(normalised);
            }
        }
        manifest
    }

    /// Returns `true` if `path` is a member of the archive, file or directory.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        normalise_member(path).is_some_and(|normalised| {
            self.files.contains(&normalised) || self.directories.contains(&normalised)
        })
    }

    /// Returns `true` if `<top_dir>/<logical>` is a non-directory member of
    /// the archive.
    #[must_use]
    pub fn contains_qualified(&self, top_dir: &str, logical: &LogicalPath) -> bool {
        self.files.contains(&logical.qualified(top_dir))
    }

    /// The distinct first path components of every member.
    #[must_use]
    pub fn top_level_dirs(&self) -> BTreeSet<&str> {
        self.all_members()
            .filter_map(|member| member.split('/').next())
            .collect()
    }

    /// Members in sorted order.
    #[must_use]
    pub fn sorted_members(&self) -> Vec<&str> {
        self.all_members().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Number of distinct members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
            + self
                .directories
                .iter()
                .filter(|dir| !self.files.contains(*dir))
                .count()
    }

    /// Returns `true` if the archive has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.directories.is_empty()
    }

    fn all_members(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .chain(&self.directories)
            .map(String::as_str)
    }
}

fn normalise_member(raw: &str) -> Option<String> {
    let mut member = raw;
    while let Some(rest) = member.strip_prefix("./") {
        member = rest;
    }
    let trimmed = member.trim_end_matches('/');
    if trimmed.is_empty() || trimmed == "." {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
