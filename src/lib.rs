//! Distribution archive auditor.
//!
//! A repository tracks templates such as `config.py.in`, and the build
//! generates `config.py` from each one. This crate checks that a source
//! distribution archive ships the templates but not the generated files,
//! except for those on an allow-list. It is used by the `distcheck` CLI
//! binary and can be consumed programmatically, for example from a release
//! pipeline's own tests.
//!
//! # Modules
//!
//! - [`allow_list`] - Generated files that are shipped on purpose
//! - [`archive`] - Archive formats, member listing, and digests
//! - [`audit`] - The audit itself and its report
//! - [`audit_flow`] - `audit` command orchestration
//! - [`cli`] - Command-line argument definitions
//! - [`command`] - External command execution with timeouts
//! - [`config`] - `distcheck.toml` loading
//! - [`error`] - Error types
//! - [`list`] - `list` command implementation
//! - [`locate`] - Finding the archive in an export directory
//! - [`logging`] - Log subscriber initialisation
//! - [`report`] - Human and JSON output formatting
//! - [`template`] - Template files and the paths generated from them
//! - [`tracked`] - Sources of version-control-tracked files

pub mod allow_list;
pub mod archive;
pub mod audit;
pub mod audit_flow;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod list;
pub mod locate;
pub mod logging;
pub mod report;
pub mod template;
pub mod tracked;

#[cfg(test)]
mod test_utils;
