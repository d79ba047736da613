//! The allow-list of generated files that may ship in a distribution.
//!
//! Some generated files are committed in ready-to-use form for downstream
//! packagers. Listing their logical paths here exempts them from the leak
//! check. The list is static configuration: it is never derived from the
//! archive being audited.

use crate::template::LogicalPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A fixed set of logical paths exempt from the leak check.
///
/// # Examples
///
/// ```
/// use distcheck::allow_list::AllowList;
/// use distcheck::template::LogicalPath;
///
/// let allow = AllowList::from_iter(["tests/run_tests.sh"]);
/// assert!(allow.contains(&LogicalPath::from("tests/run_tests.sh")));
/// assert!(!allow.contains(&LogicalPath::from("config.py")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(BTreeSet<LogicalPath>);

impl AllowList {
    /// Create an empty allow-list.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns `true` if `path` is exempt from the leak check.
    #[must_use]
    pub fn contains(&self, path: &LogicalPath) -> bool {
        self.0.contains(path)
    }

    /// Add a logical path to the list.
    pub fn insert(&mut self, path: impl Into<LogicalPath>) {
        self.0.insert(path.into());
    }

    /// Number of exempt paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing is exempt.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the exempt paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &LogicalPath> {
        self.0.iter()
    }
}

impl<P: Into<LogicalPath>> FromIterator<P> for AllowList {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<P: Into<LogicalPath>> Extend<P> for AllowList {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}
