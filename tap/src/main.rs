//! `tap`: check and normalize Test Anything Protocol output.
//!
//! Reads TAP from a file or stdin, reconciles it against its plan and reports
//! the verdict through stable exit codes (see [`tap::exit_codes`]).

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};

use tap::core::summary::{Summary, failures};
use tap::io::config::{CheckConfig, load_config};
use tap::{RunReport, TapError, Writer, exit_codes, logging, read};

#[derive(Parser)]
#[command(
    name = "tap",
    version,
    about = "Check and normalize Test Anything Protocol output"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse TAP and report whether the run passed.
    Check {
        /// TAP file to read; stdin when omitted.
        path: Option<PathBuf>,
        /// Check configuration (TOML). Defaults apply if the file is missing.
        #[arg(short, long, default_value = "tap.toml")]
        config: PathBuf,
        /// Print the parsed run as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Parse TAP and re-emit it in canonical form on stdout.
    Normalize {
        /// TAP file to read; stdin when omitted.
        path: Option<PathBuf>,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Check { path, config, json } => cmd_check(path.as_deref(), &config, json),
        Command::Normalize { path } => cmd_normalize(path.as_deref()),
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    report: &'a RunReport,
    summary: &'a Summary,
    error: Option<String>,
    success: bool,
}

fn cmd_check(path: Option<&Path>, config_path: &Path, json: bool) -> Result<i32> {
    let config = load_config(config_path)?;
    let (report, outcome) = read_input(path)?;
    let summary = Summary::from_report(&report);
    let success = outcome.is_ok() && summary.is_success(config.policy());
    info!(success, tests = summary.total(), "check finished");

    let mut stdout = io::stdout().lock();
    if json {
        let payload = CheckOutput {
            report: &report,
            summary: &summary,
            error: outcome.as_ref().err().map(ToString::to_string),
            success,
        };
        let rendered = serde_json::to_string_pretty(&payload).context("serialize json")?;
        writeln!(stdout, "{rendered}").context("write stdout")?;
    } else {
        print_failures(&mut stdout, &report, &config).context("write stdout")?;
        writeln!(stdout, "summary: {}", summary.render()).context("write stdout")?;
        if let Err(err) = &outcome {
            writeln!(stdout, "error: {err}").context("write stdout")?;
        }
    }

    Ok(exit_code(&outcome, success))
}

fn cmd_normalize(path: Option<&Path>) -> Result<i32> {
    let (report, outcome) = read_input(path)?;

    let mut writer = Writer::new(io::stdout().lock());
    writer.run(&report).context("write tap")?;
    if let Err(TapError::Aborted(reason)) = &outcome {
        writer.bail_out(reason).context("write tap")?;
    }
    writer.close().context("flush stdout")?;

    if let Err(err) = &outcome {
        eprintln!("error: {err}");
    }
    let success = outcome.is_ok();
    Ok(exit_code(&outcome, success))
}

/// Parse TAP from `path` or stdin. Source failures become command errors.
fn read_input(path: Option<&Path>) -> Result<(RunReport, Result<(), TapError>)> {
    let (report, outcome) = match path {
        Some(path) => {
            debug!(path = %path.display(), "reading tap file");
            let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
            read(BufReader::new(file))
        }
        None => {
            debug!("reading tap from stdin");
            read(io::stdin().lock())
        }
    };
    match outcome {
        Err(TapError::Io(err)) => Err(err).context("read tap input"),
        outcome => Ok((report, outcome)),
    }
}

fn print_failures(out: &mut impl Write, report: &RunReport, config: &CheckConfig) -> io::Result<()> {
    for failed in failures(report) {
        if failed.name.is_empty() {
            writeln!(out, "failed: {}", failed.num)?;
        } else {
            writeln!(out, "failed: {} {}", failed.num, failed.name)?;
        }
        if !config.show_diagnostics {
            continue;
        }
        for line in failed.diagnostics.iter().take(config.max_diagnostic_lines) {
            writeln!(out, "    {line}")?;
        }
        let hidden = failed
            .diagnostics
            .len()
            .saturating_sub(config.max_diagnostic_lines);
        if hidden > 0 {
            writeln!(out, "    [{hidden} more diagnostic lines]")?;
        }
    }
    Ok(())
}

fn exit_code(outcome: &Result<(), TapError>, success: bool) -> i32 {
    match outcome {
        Err(TapError::Aborted(_)) => exit_codes::ABORTED,
        Err(TapError::Io(_)) => exit_codes::INVALID,
        Err(_) => exit_codes::FAILED,
        Ok(()) if success => exit_codes::OK,
        Ok(()) => exit_codes::FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tap::test_support::{fail, named, pass, with_diagnostics};

    #[test]
    fn parse_check_defaults() {
        let cli = Cli::parse_from(["tap", "check"]);
        match cli.command {
            Command::Check { path, config, json } => {
                assert_eq!(path, None);
                assert_eq!(config, PathBuf::from("tap.toml"));
                assert!(!json);
            }
            Command::Normalize { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn parse_check_with_path_and_json() {
        let cli = Cli::parse_from(["tap", "check", "out.tap", "--json", "-c", "ci.toml"]);
        match cli.command {
            Command::Check { path, config, json } => {
                assert_eq!(path, Some(PathBuf::from("out.tap")));
                assert_eq!(config, PathBuf::from("ci.toml"));
                assert!(json);
            }
            Command::Normalize { .. } => panic!("expected check"),
        }
    }

    #[test]
    fn parse_normalize() {
        let cli = Cli::parse_from(["tap", "normalize"]);
        assert!(matches!(cli.command, Command::Normalize { path: None }));
    }

    #[test]
    fn exit_codes_follow_outcome() {
        assert_eq!(exit_code(&Ok(()), true), exit_codes::OK);
        assert_eq!(exit_code(&Ok(()), false), exit_codes::FAILED);
        assert_eq!(exit_code(&Err(TapError::NoTests), false), exit_codes::FAILED);
        assert_eq!(
            exit_code(&Err(TapError::Aborted("x".to_string())), false),
            exit_codes::ABORTED
        );
    }

    #[test]
    fn print_failures_limits_diagnostics() {
        let report = RunReport {
            plan: None,
            tests: vec![
                Some(pass(1)),
                Some(with_diagnostics(named(fail(2), "boops"), &["a", "b", "c"])),
            ],
        };
        let config = CheckConfig {
            max_diagnostic_lines: 2,
            ..CheckConfig::default()
        };
        let mut out = Vec::new();
        print_failures(&mut out, &report, &config).expect("print");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "failed: 2 boops\n    a\n    b\n    [1 more diagnostic lines]\n"
        );
    }
}
