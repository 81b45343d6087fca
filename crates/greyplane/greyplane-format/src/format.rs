//! Pixel format table
//!
//! Colour crosses the public boundary as a *normalized* 0–255 scalar. Each format
//! stores a *native* value (a 1, 2, 4, 8 or 16 bit field) and converts between the
//! two with integer arithmetic only.

use crate::fixed::byte_div;

/// On-wire pixel encodings.
///
/// Discriminants are the numeric format codes used by host framebuffer objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PixelFormat {
    /// 1 bpp, 8 vertically stacked pixels per byte, LSB at the top
    MonoVlsb = 0,
    /// 16 bpp, 5/6/5 bit red/green/blue
    Rgb565 = 1,
    /// 4 bpp, two pixels per byte, even column in the high nibble
    Grey4Hmsb = 2,
    /// 1 bpp, 8 horizontal pixels per byte, leftmost pixel in bit 7
    MonoHlsb = 3,
    /// 1 bpp, 8 horizontal pixels per byte, leftmost pixel in bit 0
    MonoHmsb = 4,
    /// 2 bpp, four pixels per byte, leftmost pixel in bits 0..2
    Grey2Hmsb = 5,
    /// 8 bpp, one pixel per byte
    Grey8 = 6,
}

impl PixelFormat {
    /// Every supported format, in format-code order.
    pub const ALL: [PixelFormat; 7] = [
        PixelFormat::MonoVlsb,
        PixelFormat::Rgb565,
        PixelFormat::Grey4Hmsb,
        PixelFormat::MonoHlsb,
        PixelFormat::MonoHmsb,
        PixelFormat::Grey2Hmsb,
        PixelFormat::Grey8,
    ];

    /// Look up a format by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::MonoVlsb),
            1 => Some(Self::Rgb565),
            2 => Some(Self::Grey4Hmsb),
            3 => Some(Self::MonoHlsb),
            4 => Some(Self::MonoHmsb),
            5 => Some(Self::Grey2Hmsb),
            6 => Some(Self::Grey8),
            _ => None,
        }
    }

    /// Numeric format code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Bits per pixel as reported by the format table.
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            Self::MonoVlsb | Self::MonoHlsb | Self::MonoHmsb => 1,
            Self::Grey2Hmsb => 2,
            Self::Grey4Hmsb => 4,
            Self::Grey8 => 8,
            Self::Rgb565 => 16,
        }
    }

    /// Short display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::MonoVlsb => "MONO_VLSB",
            Self::Rgb565 => "RGB565",
            Self::Grey4Hmsb => "GS4_HMSB",
            Self::MonoHlsb => "MONO_HLSB",
            Self::MonoHmsb => "MONO_HMSB",
            Self::Grey2Hmsb => "GS2_HMSB",
            Self::Grey8 => "GS8",
        }
    }

    /// Convert a normalized 0–255 value to this format's native encoding.
    ///
    /// RGB565 replicates the grey value into all three channels.
    pub const fn to_native(self, normalized: u8) -> u32 {
        let c = normalized as u32;
        match self {
            Self::MonoVlsb | Self::MonoHlsb | Self::MonoHmsb => (c >= 128) as u32,
            Self::Grey2Hmsb => byte_div(c, 85),
            Self::Grey4Hmsb => byte_div(c, 17),
            Self::Rgb565 => ((c >> 3) & 31) << 11 | ((c >> 2) & 63) << 5 | ((c >> 3) & 31),
            Self::Grey8 => c,
        }
    }

    /// Convert a native value back to the normalized 0–255 range.
    ///
    /// RGB565 yields twice the sum of the raw channel magnitudes, a luma-like
    /// scalar rather than a reconstructed colour. Native values outside the
    /// format's field width saturate at 255.
    pub const fn to_normalized(self, native: u32) -> u8 {
        let value = match self {
            Self::MonoVlsb | Self::MonoHlsb | Self::MonoHmsb => {
                if native != 0 {
                    255
                } else {
                    0
                }
            }
            Self::Grey2Hmsb => native.saturating_mul(85),
            Self::Grey4Hmsb => native.saturating_mul(17),
            Self::Rgb565 => {
                let word = native & 0xFFFF;
                ((word >> 11) + (word & 31) + ((word >> 5) & 63)) * 2
            }
            Self::Grey8 => native,
        };
        if value > 255 {
            255
        } else {
            value as u8
        }
    }
}

/// A raw format code as declared by a caller or host object.
///
/// Codes outside the table are legal: they bind to an inert surface, or to the
/// delegate accessor when a host object supplies its own pixel methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FormatCode(pub u8);

impl FormatCode {
    /// The known format this code names, if any.
    pub const fn format(self) -> Option<PixelFormat> {
        PixelFormat::from_code(self.0)
    }
}

impl From<PixelFormat> for FormatCode {
    fn from(format: PixelFormat) -> Self {
        Self(format.code())
    }
}

impl From<u8> for FormatCode {
    fn from(code: u8) -> Self {
        Self(code)
    }
}

/// Normalized → native for an optional format; unknown formats pass the value through.
pub const fn to_native(normalized: u8, format: Option<PixelFormat>) -> u32 {
    match format {
        Some(format) => format.to_native(normalized),
        None => normalized as u32,
    }
}

/// Native → normalized for an optional format; unknown formats pass the value
/// through, saturating at 255.
pub const fn to_normalized(native: u32, format: Option<PixelFormat>) -> u8 {
    match format {
        Some(format) => format.to_normalized(native),
        None => {
            if native > 255 {
                255
            } else {
                native as u8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for format in PixelFormat::ALL {
            assert_eq!(PixelFormat::from_code(format.code()), Some(format));
        }
        assert_eq!(PixelFormat::from_code(7), None);
        assert_eq!(PixelFormat::from_code(255), None);
    }

    #[test]
    fn test_bits_per_pixel_table() {
        let bpp: [u8; 7] = [1, 16, 4, 1, 1, 2, 8];
        for (format, expected) in PixelFormat::ALL.iter().zip(bpp) {
            assert_eq!(format.bits_per_pixel(), expected, "{}", format.name());
        }
    }

    #[test]
    fn test_mono_threshold() {
        for format in [PixelFormat::MonoVlsb, PixelFormat::MonoHlsb, PixelFormat::MonoHmsb] {
            assert_eq!(format.to_native(127), 0);
            assert_eq!(format.to_native(128), 1);
            assert_eq!(format.to_normalized(0), 0);
            assert_eq!(format.to_normalized(1), 255);
            assert_eq!(format.to_normalized(7), 255);
        }
    }

    #[test]
    fn test_grey2_levels() {
        let g = PixelFormat::Grey2Hmsb;
        assert_eq!(g.to_native(0), 0);
        assert_eq!(g.to_native(84), 0);
        assert_eq!(g.to_native(85), 1);
        assert_eq!(g.to_native(200), 2);
        assert_eq!(g.to_native(255), 3);
        assert_eq!(g.to_normalized(2), 170);
    }

    #[test]
    fn test_grey4_levels() {
        let g = PixelFormat::Grey4Hmsb;
        assert_eq!(g.to_native(16), 0);
        assert_eq!(g.to_native(17), 1);
        assert_eq!(g.to_native(128), 7);
        assert_eq!(g.to_native(255), 15);
        assert_eq!(g.to_normalized(15), 255);
    }

    #[test]
    fn test_rgb565_luma_scalar() {
        let rgb = PixelFormat::Rgb565;
        assert_eq!(rgb.to_native(255), 0xFFFF);
        assert_eq!(rgb.to_native(0), 0);
        // (31 + 63 + 31) * 2
        assert_eq!(rgb.to_normalized(0xFFFF), 250);
        // pure red: 31 * 2
        assert_eq!(rgb.to_normalized(0xF800), 62);
        // pure green: 63 * 2
        assert_eq!(rgb.to_normalized(0x07E0), 126);
    }

    #[test]
    fn test_unknown_format_is_identity() {
        assert_eq!(to_native(93, None), 93);
        assert_eq!(to_normalized(93, None), 93);
        assert_eq!(to_normalized(1000, None), 255);
        assert_eq!(FormatCode(42).format(), None);
        assert_eq!(FormatCode::from(PixelFormat::Grey8).format(), Some(PixelFormat::Grey8));
    }

    #[test]
    fn test_out_of_range_native_saturates() {
        assert_eq!(PixelFormat::Grey2Hmsb.to_normalized(4), 255);
        assert_eq!(PixelFormat::Grey8.to_normalized(300), 255);
    }
}
