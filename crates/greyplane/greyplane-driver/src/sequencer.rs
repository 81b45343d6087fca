//! Bit-plane sequencing
//!
//! One grey cycle shows `grey_bits` sub-frames, most significant plane first.
//! After the last plane the cycle restarts at level 0 and, with temporal
//! dithering on, the dither phase flips sign so successive cycles use opposite
//! checkerboards.

/// Contrast for sub-frame `level`: each lower plane gets a quarter of the
/// previous plane's weight.
pub fn contrast_for_level(contrast: u8, level: u32) -> u8 {
    level
        .checked_mul(2)
        .and_then(|shift| contrast.checked_shr(shift))
        .unwrap_or(0)
}

/// Current position in the grey cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequencer {
    level: u32,
    phase: i32,
    grey_bits: u32,
    temporal_dither: bool,
}

impl Sequencer {
    /// Start of a cycle with phase +1.
    pub const fn new(grey_bits: u32, temporal_dither: bool) -> Self {
        Self {
            level: 0,
            phase: 1,
            grey_bits,
            temporal_dither,
        }
    }

    /// Bit-plane of the next sub-frame.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Dither phase of the next sub-frame, ±1.
    pub fn phase(&self) -> i32 {
        self.phase
    }

    /// Bit-planes per cycle.
    pub fn grey_bits(&self) -> u32 {
        self.grey_bits
    }

    /// True between cycles, where the backbuffer may be replaced without tearing.
    pub fn at_cycle_start(&self) -> bool {
        self.level == 0
    }

    /// Move to the next sub-frame. Returns true when a cycle just completed.
    pub fn advance(&mut self) -> bool {
        self.level = self.level.saturating_add(1);
        if self.level < self.grey_bits {
            return false;
        }
        self.level = 0;
        if self.temporal_dither {
            self.phase = self.phase.saturating_neg();
        }
        true
    }

    /// Turn the per-cycle phase flip on or off.
    pub fn set_temporal_dither(&mut self, enabled: bool) {
        self.temporal_dither = enabled;
    }

    /// Back to level 0, phase +1.
    pub fn reset(&mut self) {
        self.level = 0;
        self.phase = 1;
    }
}
