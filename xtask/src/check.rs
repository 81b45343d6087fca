use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo_step, finish, OnFailure};

/// Bare-metal target the library crates must build for.
const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

/// Library crates that must stay no_std.
const LIBRARY_CRATES: [&str; 3] = ["greyplane-format", "greyplane-core", "greyplane-driver"];

struct Step {
    label: String,
    args: Vec<String>,
    on_failure: OnFailure,
}

impl Step {
    fn new(label: impl Into<String>, args: &[&str], on_failure: OnFailure) -> Self {
        Self {
            label: label.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            on_failure,
        }
    }
}

fn steps() -> Vec<Step> {
    let mut steps = Vec::new();

    for krate in LIBRARY_CRATES {
        steps.push(Step::new(
            format!("{krate} (no_std, {EMBEDDED_TARGET})"),
            &["check", "-p", krate, "--target", EMBEDDED_TARGET, "--no-default-features"],
            OnFailure::Abort,
        ));
    }
    steps.push(Step::new(
        format!("greyplane-driver + defmt ({EMBEDDED_TARGET})"),
        &["check", "-p", "greyplane-driver", "--target", EMBEDDED_TARGET, "--features", "defmt"],
        OnFailure::Abort,
    ));
    steps.push(Step::new(
        "workspace, all features (host)",
        &["check", "--workspace", "--all-features"],
        OnFailure::Abort,
    ));
    steps.push(Step::new(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    ));
    steps.push(Step::new("formatting", &["fmt", "--all", "--check"], OnFailure::Warn));

    steps
}

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 greyplane checks".cyan().bold());
    println!();

    let started = Instant::now();
    for step in steps() {
        let args: Vec<&str> = step.args.iter().map(String::as_str).collect();
        cargo_step(&step.label, &args, step.on_failure, |_| None)?;
    }
    finish("Checks finished", started);
    Ok(())
}
