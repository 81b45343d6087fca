//! Ordered dither
//!
//! A 2-phase checkerboard: pixels where `x ^ y` is even are darkened by
//! `42 * strength`, odd pixels are lightened by the same amount. Strength 0
//! disables dithering.

use crate::fixed::clamp_normalized;

/// Half the spread of the checkerboard at strength 1.
pub const DITHER_SPREAD: i32 = 42;

/// Signed offset added to a normalized value at `(x, y)`.
#[inline]
// phase is 0 or 1, so the factor is exactly -42 or +42
#[allow(clippy::arithmetic_side_effects)]
pub const fn perturbation(strength: i32, x: i32, y: i32) -> i32 {
    let phase = (x ^ y) & 1;
    strength.saturating_mul(phase * 2 * DITHER_SPREAD - DITHER_SPREAD)
}

/// Dithered value without clamping, for threshold tests.
///
/// Only the side of 127 the result falls on matters to the 1 bpp writers.
#[inline]
pub const fn perturb(value: u8, strength: i32, x: i32, y: i32) -> i32 {
    if strength == 0 {
        value as i32
    } else {
        (value as i32).saturating_add(perturbation(strength, x, y))
    }
}

/// Dithered value clamped back into `0..=255`, for paths that re-encode it.
#[inline]
pub const fn perturb_clamped(value: u8, strength: i32, x: i32, y: i32) -> u8 {
    clamp_normalized(perturb(value, strength, x, y))
}
