//! Integer-only division and alpha mixing
//!
//! Targets without a hardware divider pay dearly for `/255` in a per-pixel
//! blend. [`byte_div`] multiplies by a 24-bit fixed-point reciprocal instead.
//! For numerators in `0..=255*255` and divisors 17, 85 and 255 the result is
//! exactly `n / d` (truncating).

// All products below are bounded by 255 * 255 * 65794 < u32::MAX for the
// documented operand ranges; wider inputs wrap exactly like the 32-bit
// reference arithmetic.
#![allow(clippy::arithmetic_side_effects)]

/// Fixed-point reciprocal `ceil(2^24 / d)`; zero for `d == 0`.
const fn reciprocal(d: u32) -> u32 {
    match (1u32 << 24).wrapping_add(d.saturating_sub(1)).checked_div(d) {
        Some(r) => r,
        None => 0,
    }
}

/// `n / d` via a 24-bit reciprocal multiply.
#[inline]
pub const fn byte_div(n: u32, d: u32) -> u32 {
    n.wrapping_mul(reciprocal(d)) >> 24
}

/// Alpha-mix two normalized values: `(new*alpha + old*(255-alpha)) / 255`.
#[inline]
pub const fn mix(new: u8, old: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    let sum = (new as u32) * a + (old as u32) * (255 - a);
    // sum <= 255 * 255, so the quotient is at most 255
    byte_div(sum, 255) as u8
}

/// Clamp a signed intermediate back into the normalized range.
#[inline]
pub const fn clamp_normalized(value: i32) -> u8 {
    if value <= 0 {
        0
    } else if value >= 255 {
        255
    } else {
        value as u8
    }
}
