//! Configuration loaded from `distcheck.toml`.
//!
//! The file usually lives at the repository root next to the templates it
//! describes, so the allow-list is reviewed alongside the packaging changes
//! that need it. Every key is optional; command-line flags override the file.

use crate::allow_list::AllowList;
use crate::audit::{AuditOptions, FailurePolicy, TopDirStrategy};
use crate::command::DEFAULT_COMMAND_TIMEOUT;
use crate::error::{AuditError, Result};
use crate::template::{DEFAULT_TEMPLATE_SUFFIX, TemplateSuffix};
use camino::Utf8Path;
use log::debug;
use serde::Deserialize;
use std::io::ErrorKind;
use std::time::Duration;

/// File name looked up in the repository when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "distcheck.toml";

/// Settings for an audit run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Archive name prefix used to locate the archive in an export
    /// directory.
    pub product: Option<String>,
    /// Marker suffix that identifies templates.
    pub template_suffix: String,
    /// Generated files intentionally shipped in the archive.
    pub allow: AllowList,
    /// Fail-fast or collect-all.
    pub failure_policy: FailurePolicy,
    /// How the archive's top-level directory is determined.
    pub top_dir: TopDirStrategy,
    /// Timeout for the version-control query, in seconds.
    pub command_timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            product: None,
            template_suffix: DEFAULT_TEMPLATE_SUFFIX.to_owned(),
            allow: AllowList::default(),
            failure_policy: FailurePolicy::default(),
            top_dir: TopDirStrategy::default(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
        }
    }
}

impl AuditConfig {
    /// Parse configuration from TOML text.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidConfig`] if the text is not valid TOML or
    /// contains unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use distcheck::config::AuditConfig;
    ///
    /// let config = AuditConfig::from_toml_str(
    ///     "product = \"vdsm\"\nallow = [\"tests/run_tests.sh\"]\n",
    ///     Utf8Path::new("distcheck.toml"),
    /// )?;
    /// assert_eq!(config.product.as_deref(), Some("vdsm"));
    /// assert_eq!(config.allow.len(), 1);
    /// # Ok::<(), distcheck::error::AuditError>(())
    /// ```
    pub fn from_toml_str(source: &str, path: &Utf8Path) -> Result<Self> {
        toml::from_str(source).map_err(|err| AuditError::InvalidConfig {
            path: path.to_owned(),
            reason: err.message().to_owned(),
        })
    }

    /// Load configuration from `path`, which must exist.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidConfig`] if the file cannot be read or
    /// parsed.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|err| AuditError::InvalidConfig {
            path: path.to_owned(),
            reason: err.to_string(),
        })?;
        Self::from_toml_str(&source, path)
    }

    /// Load `distcheck.toml` from `repo`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidConfig`] if the file exists but cannot be
    /// read or parsed.
    pub fn discover(repo: &Utf8Path) -> Result<Self> {
        let path = repo.join(CONFIG_FILE_NAME);
        match std::fs::read_to_string(&path) {
            Ok(source) => Self::from_toml_str(&source, &path),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no {CONFIG_FILE_NAME} in {repo}; using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(AuditError::InvalidConfig {
                path,
                reason: err.to_string(),
            }),
        }
    }

    /// Build [`AuditOptions`] from the configured values.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::InvalidTemplateSuffix`] if the suffix is empty.
    pub fn audit_options(&self) -> Result<AuditOptions> {
        Ok(AuditOptions {
            template_suffix: TemplateSuffix::new(self.template_suffix.as_str())?,
            failure_policy: self.failure_policy,
            top_dir: self.top_dir,
        })
    }

    /// The version-control query timeout.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
