//! `distcheck` CLI entrypoint.
//!
//! Audits a source-distribution archive for generated files that leaked in
//! from tracked templates, or lists an archive's members.

use clap::Parser;
use distcheck::audit::Verdict;
use distcheck::audit_flow::run_audit;
use distcheck::cli::{Cli, Command};
use distcheck::error::Result;
use distcheck::list::run_list;
use distcheck::logging;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    if let Err(err) = logging::init(cli.verbosity, cli.quiet) {
        write_stderr_line(&mut stderr, format!("warning: logging unavailable: {err}"));
    }

    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<Verdict> {
    match &cli.command {
        Command::Audit(args) => run_audit(args, stdout, stderr),
        Command::List(args) => run_list(args, stdout).map(|()| Verdict::Pass),
    }
}

fn exit_code_for_run_result(result: Result<Verdict>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(Verdict::Pass) => 0,
        Ok(Verdict::Fail { .. }) => 1,
        Err(err) => {
            write_stderr_line(stderr, format!("error: {err}"));
            let mut source = std::error::Error::source(&err);
            while let Some(cause) = source {
                write_stderr_line(stderr, format!("  caused by: {cause}"));
                source = cause.source();
            }
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
