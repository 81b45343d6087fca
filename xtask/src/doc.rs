use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo_step, finish, OnFailure};

/// Rustdoc output for the crate that re-exports the public surface.
const INDEX: &str = "target/doc/greyplane_core/index.html";

fn doc_args(open: bool) -> Vec<&'static str> {
    let mut args = vec![
        "doc",
        "--workspace",
        "--exclude",
        "xtask",
        "--no-deps",
        "--all-features",
    ];
    if open {
        args.push("--open");
    }
    args
}

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 greyplane docs".cyan().bold());
    println!();

    let started = Instant::now();
    cargo_step("rustdoc (all features)", &doc_args(open), OnFailure::Abort, |_| None)?;

    if !open {
        println!("   {}", format!("index: {INDEX}").dimmed());
        println!();
    }
    finish("Docs built", started);
    Ok(())
}
