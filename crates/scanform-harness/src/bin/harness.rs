//! CLI entrypoint for the scanform conformance harness.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use scanform_harness::fixtures::{CaseMode, FixtureSet};
use scanform_harness::runner::TestRunner;
use scanform_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogEntry, LogLevel, Outcome, validate_log_file,
};
use scanform_harness::verify::{report_markdown, summarize};

/// Conformance tooling for scanform.
#[derive(Debug, Parser)]
#[command(name = "scanform-harness")]
#[command(about = "Conformance testing harness for scanform")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the engine against a fixture file.
    Verify {
        /// Fixture JSON file.
        #[arg(long)]
        fixture: PathBuf,
        /// Binding mode to exercise (classic or checked).
        #[arg(long, default_value = "classic")]
        mode: String,
        /// Output report path (markdown). Prints to stdout when omitted.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Artifact index JSON output path.
        #[arg(long)]
        artifact_index: Option<PathBuf>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        /// Structured JSONL log path.
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Verify {
            fixture,
            mode,
            report,
            log,
            artifact_index,
        } => run_verify(&fixture, &mode, report, log, artifact_index),
        Command::ValidateLog { log } => run_validate_log(&log),
    }
}

fn parse_mode(mode: &str) -> Option<CaseMode> {
    match mode.to_ascii_lowercase().as_str() {
        "classic" => Some(CaseMode::Classic),
        "checked" | "secure" => Some(CaseMode::Checked),
        _ => None,
    }
}

fn run_verify(
    fixture: &PathBuf,
    mode: &str,
    report: Option<PathBuf>,
    log: Option<PathBuf>,
    artifact_index: Option<PathBuf>,
) -> ExitCode {
    let Some(active_mode) = parse_mode(mode) else {
        eprintln!("unknown mode `{mode}` (expected classic or checked)");
        return ExitCode::FAILURE;
    };
    let set = match FixtureSet::from_file(fixture) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("cannot load fixture {}: {e}", fixture.display());
            return ExitCode::FAILURE;
        }
    };

    let runner = TestRunner::new(set.family.clone(), active_mode);
    let results = runner.run(&set);
    let summary = summarize(&results);
    let rendered = report_markdown(&set.family, mode, &results);

    if let Some(log_path) = log {
        if let Err(e) = write_log(&log_path, &set.family, &results) {
            eprintln!("cannot write log {}: {e}", log_path.display());
            return ExitCode::FAILURE;
        }
    }

    match report {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, &rendered) {
                eprintln!("cannot write report {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
            if let Some(index_path) = artifact_index {
                if let Err(e) = write_artifact_index(&index_path, &path) {
                    eprintln!("cannot write artifact index {}: {e}", index_path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
        None => println!("{rendered}"),
    }

    eprintln!(
        "{}: {} total, {} passed, {} failed",
        set.family, summary.total, summary.passed, summary.failed
    );
    if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn write_log(
    path: &PathBuf,
    family: &str,
    results: &[scanform_harness::VerificationResult],
) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(path)?;
    let mut emitter = LogEmitter::new(file);
    let trace_id = format!("verify-{family}");
    for result in results {
        let outcome = if result.passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        let entry = LogEntry::new(trace_id.clone(), LogLevel::Info, "case_done")
            .with_case(result.case_name.clone(), outcome);
        emitter.emit(&entry)?;
    }
    Ok(())
}

fn write_artifact_index(
    index_path: &PathBuf,
    report_path: &PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut index = ArtifactIndex::default();
    index.record_file(report_path)?;
    std::fs::write(index_path, serde_json::to_string_pretty(&index)?)?;
    Ok(())
}

fn run_validate_log(log: &PathBuf) -> ExitCode {
    match validate_log_file(log) {
        Ok(count) => {
            eprintln!("{}: {count} valid entries", log.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {e}", log.display());
            ExitCode::FAILURE
        }
    }
}
