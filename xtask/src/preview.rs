// Host-only tool: sizes come from the command line and are validated up front.
#![allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use anyhow::{Context, Result};
use colored::Colorize;
use greyplane_core::GreyContext;
use greyplane_driver::{contrast_for_level, DisplayConfig, Sequencer};

const RAMP: &[u8] = b" .:-=+*#%@";

/// Grey cycles averaged into the picture. Two cycles cover both dither phases.
const CYCLES: u32 = 2;

pub fn run(bpp: u32, width: u32, height: u32, dither_bits: Option<u32>) -> Result<()> {
    if width == 0 || width > 128 {
        anyhow::bail!("width must be between 1 and 128, got {width}");
    }
    if height == 0 || height % 8 != 0 || height > 64 {
        anyhow::bail!("height must be a multiple of 8 up to 64, got {height}");
    }

    let mut config = DisplayConfig::preset(bpp);
    config.width = width;
    config.height = height;
    if let Some(bits) = dither_bits {
        config.dither_bits = bits;
    }

    println!();
    println!("{}", "🖥  Bit-plane preview".cyan().bold());
    println!(
        "   {}",
        format!(
            "{}x{} {} | grey bits {} | dither bits {} | {} sub-frames",
            config.width,
            config.height,
            config.format.name(),
            config.grey_bits,
            config.dither_bits,
            CYCLES * config.grey_bits
        )
        .dimmed()
    );
    println!();

    let weights = simulate(&config)?;
    let peak = full_scale(&config);

    for row in weights.chunks(width as usize) {
        let line: String = row
            .iter()
            .map(|&w| {
                let idx = (w * (RAMP.len() as u64 - 1) + peak / 2) / peak.max(1);
                char::from(RAMP[(idx as usize).min(RAMP.len() - 1)])
            })
            .collect();
        println!("   |{line}|");
    }
    println!();
    println!(
        "   {}",
        "Left to right: a 0..255 gradient as the panel integrates it".dimmed()
    );
    println!();

    Ok(())
}

/// Draw a horizontal gradient, run the sequencer for [`CYCLES`] grey cycles
/// and sum the contrast every lit pixel receives.
fn simulate(config: &DisplayConfig) -> Result<Vec<u64>> {
    let (width, height) = (config.width as usize, config.height as usize);
    let mut backbuffer = vec![0u8; config.buffer_len()];
    let mut ctx = GreyContext::with_config(config.page_config());
    ctx.set_backbuffer(&mut backbuffer, config.format)
        .context("backbuffer rejected")?;

    let span = config.width.saturating_sub(1).max(1);
    for y in 0..config.height {
        for x in 0..config.width {
            let value = (x * 255 / span).min(255) as u8;
            ctx.set_pixel(x as i32, y as i32, value);
        }
    }

    let mut weights = vec![0u64; width * height];
    let mut page = vec![0u8; width];
    let mut sequencer = Sequencer::new(config.grey_bits, config.temporal_dither);

    for _ in 0..CYCLES * config.grey_bits {
        let level = sequencer.level();
        let weight = u64::from(contrast_for_level(config.contrast, level));
        for p in 0..config.page_count() {
            ctx.generate_page(&mut page, p, level, sequencer.phase())
                .context("page generation failed")?;
            for (x, byte) in page.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (1 << bit) == 0 {
                        continue;
                    }
                    let y = height - 1 - p as usize * 8 - bit;
                    weights[y * width + x] += weight;
                }
            }
        }
        sequencer.advance();
    }

    Ok(weights)
}

/// Weight of a pixel lit in every sub-frame.
fn full_scale(config: &DisplayConfig) -> u64 {
    (0..config.grey_bits)
        .map(|level| u64::from(contrast_for_level(config.contrast, level)))
        .sum::<u64>()
        * u64::from(CYCLES)
}
