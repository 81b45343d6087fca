// Host tooling: unwrap/expect/panic are fine outside the embedded crates.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod doc;
mod preview;
mod step;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "greyplane development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the library crates on the host and as no_std for a Cortex-M target
    Check,
    /// Run all tests (unit, integration, and doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Build and optionally open documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Render a test pattern through the bit-plane pipeline and print what the
    /// panel would show, averaged over two grey cycles
    Preview {
        /// Bits-per-pixel preset (1, 2, 3, 4 or 8)
        #[arg(long, default_value_t = 4)]
        bpp: u32,
        /// Panel width in pixels
        #[arg(long, default_value_t = 72)]
        width: u32,
        /// Panel height in pixels (multiple of 8)
        #[arg(long, default_value_t = 40)]
        height: u32,
        /// Override the preset's dither multiplier
        #[arg(long)]
        dither_bits: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Library events (binding, config updates) show up with RUST_LOG=greyplane_core=debug
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::Doc { open } => doc::run(open),
        Commands::Preview {
            bpp,
            width,
            height,
            dither_bits,
        } => preview::run(bpp, width, height, dither_bits),
    }
}
