//! Bit-plane page generation
//!
//! A display with one bit per pixel shows `grey_bits` grey levels by cycling
//! through bit-planes: sub-frame `level` lights the pixels whose value has bit
//! `7 - level` set, and the panel's per-sub-frame contrast weights the planes.
//!
//! One page is eight rows of that plane, packed one byte per column. Pages
//! are counted from the bottom of the source image and bit 0 of each byte
//! holds the lowest row of the band, which matches a panel mounted upside
//! down relative to the SSD1306 page layout.
//!
//! Before thresholding, each pixel is offset by a dither amplitude whose sign
//! alternates from row to row and from column to column (a spatial
//! checkerboard). The caller flips `dither_phase` between full level cycles to
//! add a temporal component.

use greyplane_format::clamp_normalized;

use crate::surface::Surface;
use crate::Error;

/// Rows packed into one page byte.
pub const PAGE_ROWS: u32 = 8;

/// Anything the page generator can sample.
pub trait PixelSource {
    /// Normalized value of pixel `(x, y)`.
    fn get_pixel(&self, x: i32, y: i32) -> u8;
}

impl PixelSource for Surface<'_> {
    fn get_pixel(&self, x: i32, y: i32) -> u8 {
        Surface::get_pixel(self, x, y)
    }
}

/// Geometry and dither settings of the page generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageConfig {
    /// Columns per page
    pub width: u32,
    /// Rows in the source image
    pub height: u32,
    /// Target quantization depth; larger values shrink the dither amplitude
    pub grey_bits: u32,
    /// Dither amplitude multiplier; 0 disables dithering
    pub dither_bits: u32,
}

impl PageConfig {
    /// 72×40 panel, 2 grey bits, dither on.
    pub const DEFAULT: Self = Self {
        width: 72,
        height: 40,
        grey_bits: 2,
        dither_bits: 1,
    };

    /// Overwrite each field for which a non-negative value is given.
    pub fn update(
        &mut self,
        width: Option<i32>,
        height: Option<i32>,
        grey_bits: Option<i32>,
        dither_bits: Option<i32>,
    ) {
        fn apply(field: &mut u32, value: Option<i32>) {
            if let Some(v) = value.and_then(|v| u32::try_from(v).ok()) {
                *field = v;
            }
        }
        apply(&mut self.width, width);
        apply(&mut self.height, height);
        apply(&mut self.grey_bits, grey_bits);
        apply(&mut self.dither_bits, dither_bits);
        tracing::debug!(
            width = self.width,
            height = self.height,
            grey_bits = self.grey_bits,
            dither_bits = self.dither_bits,
            "page generator configured"
        );
    }

    /// Number of whole pages covering the image height.
    pub fn page_count(&self) -> u32 {
        self.height / PAGE_ROWS
    }

    /// Unsigned dither amplitude for a phase of ±1:
    /// `(0x40 >> grey_bits) * dither_bits`.
    pub fn dither_amplitude(&self) -> i32 {
        let step = 0x40i32.checked_shr(self.grey_bits).unwrap_or(0);
        step.saturating_mul(i32::try_from(self.dither_bits).unwrap_or(i32::MAX))
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Emits bit-plane pages from a [`PixelSource`].
#[derive(Debug, Clone, Default)]
pub struct PageGenerator {
    config: PageConfig,
}

impl PageGenerator {
    /// Generator with the given configuration.
    pub const fn new(config: PageConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Mutable configuration.
    pub fn config_mut(&mut self) -> &mut PageConfig {
        &mut self.config
    }

    /// Write page `page` of bit-plane `level` into `out[..width]`.
    ///
    /// `level` 0 tests the most significant bit (mask `0x80 >> level`);
    /// levels past 7 produce an all-zero page. `dither_phase` scales the
    /// dither amplitude and is normally ±1, or 0 to disable it.
    ///
    /// # Errors
    ///
    /// [`Error::BufferTooSmall`] if `out` is shorter than the configured width.
    pub fn generate_page(
        &self,
        source: &impl PixelSource,
        out: &mut [u8],
        page: u32,
        level: u32,
        dither_phase: i32,
    ) -> Result<(), Error> {
        let width = usize::try_from(self.config.width).unwrap_or(usize::MAX);
        let actual = out.len();
        let out = out.get_mut(..width).ok_or(Error::BufferTooSmall {
            required: width,
            actual,
        })?;

        let level_mask = 0x80u32.checked_shr(level).unwrap_or(0);
        let mut dither = dither_phase.saturating_mul(self.config.dither_amplitude());

        let height = i32::try_from(self.config.height).unwrap_or(i32::MAX);
        let page_offset = i32::try_from(page)
            .unwrap_or(i32::MAX)
            .saturating_mul(8);
        let row_base = height.saturating_sub(1).saturating_sub(page_offset);

        for (x, byte) in (0i32..).zip(out.iter_mut()) {
            dither = dither.saturating_neg();

            let mut packed = 0u8;
            for b in 0..8i32 {
                dither = dither.saturating_neg();

                let c = source.get_pixel(x, row_base.saturating_sub(b));
                let c = clamp_normalized(i32::from(c).saturating_add(dither));

                packed >>= 1;
                if u32::from(c) & level_mask != 0 {
                    packed |= 0x80;
                }
            }
            *byte = packed;
        }
        Ok(())
    }
}
