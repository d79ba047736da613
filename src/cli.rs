//! CLI argument definitions for `distcheck`.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint so the argument types can be constructed directly
//! in tests.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Audit source-distribution archives for leaked generated files.
#[derive(Parser, Debug)]
#[command(name = "distcheck")]
#[command(version, about)]
#[command(long_about = concat!(
    "Audit source-distribution archives for leaked generated files.\n\n",
    "A repository tracks templates (such as config.py.in) from which build steps ",
    "generate files (config.py). Generated files must not ship in the source ",
    "archive unless they are on the allow-list. `distcheck audit` lists the ",
    "archive, asks git for tracked templates, and fails when a generated file ",
    "is present under the archive's top-level directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Audit an archive against the current repository:\n",
    "    $ distcheck audit --archive exported-artifacts/vdsm-4.50.1.tar.gz\n\n",
    "  Locate the archive in an export directory:\n",
    "    $ EXPORT_DIR=exported-artifacts distcheck audit --product vdsm\n\n",
    "  Permit a generated file that ships on purpose:\n",
    "    $ distcheck audit --archive vdsm-4.50.1.tar.gz --allow tests/run_tests.sh\n\n",
    "  List archive members as JSON:\n",
    "    $ distcheck list vdsm-4.50.1.tar.gz --json\n\n",
    "ENVIRONMENT:\n",
    "  EXPORT_DIR      Default for --export-dir\n",
    "  DISTCHECK_LOG   Log filter directives, overriding -v/-q",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check an archive for leaked generated files.
    Audit(AuditArgs),

    /// List the members of an archive.
    List(ListArgs),
}

/// Arguments for the audit command.
#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Archive to audit. Takes precedence over --export-dir.
    #[arg(short, long, value_name = "FILE")]
    pub archive: Option<Utf8PathBuf>,

    /// Directory holding exactly one `<product>*` archive.
    #[arg(short, long, value_name = "DIR", env = "EXPORT_DIR")]
    pub export_dir: Option<Utf8PathBuf>,

    /// Archive name prefix used with --export-dir.
    #[arg(short, long, value_name = "NAME")]
    pub product: Option<String>,

    /// Repository whose tracked templates are checked.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub repo: Utf8PathBuf,

    /// Configuration file [default: <repo>/distcheck.toml if present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Allow a generated file to ship (repeatable, adds to the config).
    #[arg(long, value_name = "PATH")]
    pub allow: Vec<String>,

    /// Use these tracked files instead of asking git (repeatable).
    #[arg(long, value_name = "PATH")]
    pub tracked_file: Vec<String>,

    /// Template marker suffix [default: .in].
    #[arg(long, value_name = "SUFFIX")]
    pub template_suffix: Option<String>,

    /// Report every leaked file instead of stopping at the first.
    #[arg(long)]
    pub collect_all: bool,

    /// Read the top-level directory from the archive instead of its name.
    #[arg(long)]
    pub inspect_top_dir: bool,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl Default for AuditArgs {
    /// Audit the current directory's repository with every flag unset.
    fn default() -> Self {
        Self {
            archive: None,
            export_dir: None,
            product: None,
            repo: Utf8PathBuf::from("."),
            config: None,
            allow: Vec::new(),
            tracked_file: Vec::new(),
            template_suffix: None,
            collect_all: false,
            inspect_top_dir: false,
            json: false,
        }
    }
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Archive to list.
    #[arg(value_name = "ARCHIVE")]
    pub archive: Utf8PathBuf,

    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
