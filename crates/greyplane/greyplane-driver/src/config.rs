//! Panel configuration and colour-depth presets

use greyplane_core::{FormatCode, PageConfig, PixelFormat};
use greyplane_format::addressing::buffer_len;

/// Bits per pixel a format code occupies in a framebuffer.
///
/// Unknown codes count as 8 bpp.
pub fn format_bpp(code: FormatCode) -> u32 {
    code.format()
        .map_or(8, |format| u32::from(format.bits_per_pixel()))
}

/// Everything the driver needs to know about the panel and the grey rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// Panel width in pixels
    pub width: u32,
    /// Panel height in pixels (a multiple of 8)
    pub height: u32,
    /// Backbuffer pixel format
    pub format: PixelFormat,
    /// Bit-planes per grey cycle
    pub grey_bits: u32,
    /// Dither amplitude multiplier for page generation
    pub dither_bits: u32,
    /// Flip the dither phase after every full grey cycle
    pub temporal_dither: bool,
    /// Contrast of the most significant bit-plane; plane n gets `contrast >> 2n`
    pub contrast: u8,
    /// Time budget of one sub-frame in microseconds
    pub frame_period_us: u32,
    /// Multiplex lines left active while pages are being written
    pub park_lines: u8,
}

impl DisplayConfig {
    /// 72×40 panel at 4 bpp.
    pub const DEFAULT: Self = Self::preset(4);

    /// Default panel with the format and grey depth for `bpp` bits per pixel.
    ///
    /// | bpp | format | grey bits | dither bits |
    /// |-----|--------|-----------|-------------|
    /// | > 4 | GS8 | 3 | 1 |
    /// | 4 | GS4 | 3 | 1 |
    /// | 3 | GS4 | 2 | 1 |
    /// | 2 | GS2 | 2 | 0 |
    /// | other | MONO_HMSB | 1 | 0 |
    pub const fn preset(bpp: u32) -> Self {
        let (format, grey_bits, dither_bits) = match bpp {
            5.. => (PixelFormat::Grey8, 3, 1),
            4 => (PixelFormat::Grey4Hmsb, 3, 1),
            3 => (PixelFormat::Grey4Hmsb, 2, 1),
            2 => (PixelFormat::Grey2Hmsb, 2, 0),
            _ => (PixelFormat::MonoHmsb, 1, 0),
        };
        Self {
            width: 72,
            height: 40,
            format,
            grey_bits,
            dither_bits,
            temporal_dither: true,
            contrast: 255,
            frame_period_us: 5500,
            park_lines: 2,
        }
    }

    /// Switch format and grey depth to the preset for `bpp`, keeping geometry and timing.
    pub fn apply_preset(&mut self, bpp: u32) {
        let preset = Self::preset(bpp);
        self.format = preset.format;
        self.grey_bits = preset.grey_bits;
        self.dither_bits = preset.dither_bits;
    }

    /// Page generator settings for this panel.
    pub fn page_config(&self) -> PageConfig {
        PageConfig {
            width: self.width,
            height: self.height,
            grey_bits: self.grey_bits,
            dither_bits: self.dither_bits,
        }
    }

    /// Pages sent per sub-frame.
    pub fn page_count(&self) -> u32 {
        self.height / 8
    }

    /// Bytes a backbuffer (or a framebuffer meant for `show`) needs.
    pub fn buffer_len(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX);
        let height = usize::try_from(self.height).unwrap_or(usize::MAX);
        buffer_len(self.format, width, height, width).unwrap_or(usize::MAX)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let cases = [
            (16, PixelFormat::Grey8, 3, 1),
            (8, PixelFormat::Grey8, 3, 1),
            (5, PixelFormat::Grey8, 3, 1),
            (4, PixelFormat::Grey4Hmsb, 3, 1),
            (3, PixelFormat::Grey4Hmsb, 2, 1),
            (2, PixelFormat::Grey2Hmsb, 2, 0),
            (1, PixelFormat::MonoHmsb, 1, 0),
            (0, PixelFormat::MonoHmsb, 1, 0),
        ];
        for (bpp, format, grey_bits, dither_bits) in cases {
            let c = DisplayConfig::preset(bpp);
            assert_eq!(c.format, format, "bpp {bpp}");
            assert_eq!((c.grey_bits, c.dither_bits), (grey_bits, dither_bits), "bpp {bpp}");
        }
    }

    #[test]
    fn test_defaults() {
        let c = DisplayConfig::default();
        assert_eq!((c.width, c.height), (72, 40));
        assert_eq!(c.format, PixelFormat::Grey4Hmsb);
        assert_eq!(c.contrast, 255);
        assert_eq!(c.frame_period_us, 5500);
        assert_eq!(c.park_lines, 2);
        assert!(c.temporal_dither);
        assert_eq!(c.page_count(), 5);
    }

    #[test]
    fn test_apply_preset_keeps_geometry() {
        let mut c = DisplayConfig {
            width: 128,
            contrast: 40,
            ..DisplayConfig::default()
        };
        c.apply_preset(2);
        assert_eq!(c.format, PixelFormat::Grey2Hmsb);
        assert_eq!((c.width, c.contrast), (128, 40));
    }

    #[test]
    fn test_buffer_len_per_format() {
        // 72 × 40 = 2880 pixels
        for (bpp, len) in [(8, 2880), (4, 1440), (2, 720), (1, 360)] {
            assert_eq!(DisplayConfig::preset(bpp).buffer_len(), len, "bpp {bpp}");
        }
    }

    #[test]
    fn test_format_bpp() {
        assert_eq!(format_bpp(PixelFormat::MonoVlsb.into()), 1);
        assert_eq!(format_bpp(PixelFormat::Grey2Hmsb.into()), 2);
        assert_eq!(format_bpp(PixelFormat::Grey4Hmsb.into()), 4);
        assert_eq!(format_bpp(PixelFormat::Grey8.into()), 8);
        assert_eq!(format_bpp(PixelFormat::Rgb565.into()), 16);
        assert_eq!(format_bpp(FormatCode(77)), 8);
    }

    #[test]
    fn test_page_config_mirrors_panel() {
        let c = DisplayConfig::preset(3);
        let p = c.page_config();
        assert_eq!((p.width, p.height, p.grey_bits, p.dither_bits), (72, 40, 2, 1));
    }
}
