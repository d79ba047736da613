//! Template files and the logical paths they generate.
//!
//! A template is a tracked file whose name ends in a marker suffix (`.in` by
//! default). The build turns `config.py.in` into `config.py`; the latter is
//! the template's *logical path* and is what must stay out of a source
//! distribution.

use crate::error::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Suffix used by autotools-style templates when none is configured.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".in";

/// The marker suffix that identifies a template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSuffix(String);

impl TemplateSuffix {
    /// Create a suffix, rejecting the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidTemplateSuffix`] if `suffix` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use distcheck::template::TemplateSuffix;
    ///
    /// let suffix = TemplateSuffix::new(".in").expect("valid suffix");
    /// assert_eq!(suffix.glob(), "*.in");
    /// assert!(TemplateSuffix::new("").is_err());
    /// ```
    pub fn new(suffix: impl Into<String>) -> Result<Self> {
        let value = suffix.into();
        if value.is_empty() {
            return Err(AuditError::InvalidTemplateSuffix);
        }
        Ok(Self(value))
    }

    /// Get the suffix as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The pathspec glob that matches tracked templates anywhere in a tree.
    #[must_use]
    pub fn glob(&self) -> String {
        format!("*{}", self.0)
    }
}

impl Default for TemplateSuffix {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE_SUFFIX.to_owned())
    }
}

impl fmt::Display for TemplateSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A repository-relative path with `/` separators, as it would appear under
/// an archive's top-level directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Create a logical path, stripping any leading `./`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        let raw = path.into();
        match raw.strip_prefix("./") {
            Some(rest) => Self(rest.to_owned()),
            None => Self(raw),
        }
    }

    /// Get the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix the path with an archive's top-level directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use distcheck::template::LogicalPath;
    ///
    /// let path = LogicalPath::new("lib/vdsm/constants.py");
    /// assert_eq!(path.qualified("vdsm-4.50.1"), "vdsm-4.50.1/lib/vdsm/constants.py");
    /// ```
    #[must_use]
    pub fn qualified(&self, top_dir: &str) -> String {
        format!("{top_dir}/{}", self.0)
    }
}

impl AsRef<str> for LogicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogicalPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LogicalPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A tracked template and the logical path it generates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    source: String,
    logical: LogicalPath,
}

impl TemplateFile {
    /// Parse a tracked path as a template.
    ///
    /// Returns `None` when `source` does not end in `suffix`, or when
    /// stripping the suffix leaves nothing or a directory (`foo/.in`).
    ///
    /// # Examples
    ///
    /// ```
    /// use distcheck::template::{TemplateFile, TemplateSuffix};
    ///
    /// let suffix = TemplateSuffix::default();
    /// let template = TemplateFile::parse("tests/run_tests.sh.in", &suffix).expect("template");
    /// assert_eq!(template.logical_path().as_str(), "tests/run_tests.sh");
    ///
    /// assert!(TemplateFile::parse("README.md", &suffix).is_none());
    /// ```
    #[must_use]
    pub fn parse(source: &str, suffix: &TemplateSuffix) -> Option<Self> {
        let trimmed = source.strip_prefix("./").unwrap_or(source);
        let stem = trimmed.strip_suffix(suffix.as_str())?;
        if stem.is_empty() || stem.ends_with('/') {
            return None;
        }
        Some(Self {
            source: trimmed.to_owned(),
            logical: LogicalPath::new(stem),
        })
    }

    /// The tracked template path, as reported by version control.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The path of the file the build generates from this template.
    #[must_use]
    pub fn logical_path(&self) -> &LogicalPath {
        &self.logical
    }
}
