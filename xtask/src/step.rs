//! One cargo invocation with a status line, shared by every subcommand.

use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// What a failed step does to the rest of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Print cargo's output and return an error
    Abort,
    /// Print a warning and carry on
    Warn,
}

/// Result of a step that did not abort.
pub struct Outcome {
    pub passed: bool,
    pub stdout: String,
}

/// Run `cargo <args>`, printing `label` with the elapsed time.
///
/// `detail` is appended to the success line, e.g. a test summary taken from
/// stdout.
pub fn cargo_step(
    label: &str,
    args: &[&str],
    on_failure: OnFailure,
    detail: impl FnOnce(&str) -> Option<String>,
) -> Result<Outcome> {
    println!("{}", format!("  ▶ {label}").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("could not spawn `cargo {}`", args.join(" ")))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let secs = start.elapsed().as_secs_f64();

    if output.status.success() {
        let extra = detail(&stdout).map(|d| format!(" [{d}]")).unwrap_or_default();
        println!("{}", format!("  ✓ {label} ({secs:.2}s){extra}").green());
        println!();
        return Ok(Outcome {
            passed: true,
            stdout,
        });
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    match on_failure {
        OnFailure::Warn => {
            eprintln!("{}", format!("  ⚠ {label} ({secs:.2}s)").yellow().bold());
            println!();
            Ok(Outcome {
                passed: false,
                stdout,
            })
        }
        OnFailure::Abort => {
            eprintln!("{}", format!("  ✗ {label} ({secs:.2}s)").red().bold());
            for line in stdout.lines().chain(stderr.lines()) {
                eprintln!("    {line}");
            }
            anyhow::bail!("`cargo {}` failed", args.join(" "))
        }
    }
}

/// Closing line of a subcommand.
pub fn finish(what: &str, started: Instant) {
    println!(
        "{}",
        format!("✓ {what} in {:.2}s", started.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();
}
