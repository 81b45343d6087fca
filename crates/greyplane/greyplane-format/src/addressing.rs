//! Per-format pixel addressing
//!
//! Pure functions from `(x, y, stride)` to the byte and bit field holding a
//! pixel. Stride is counted in pixels for every horizontal format and in bytes
//! (columns) for [`PixelFormat::MonoVlsb`], where each byte is a vertical strip
//! of eight pixels.
//!
//! | Format | Byte | Field |
//! |--------|------|-------|
//! | MONO_VLSB | `x + (y/8)*stride` | bit `y & 7` |
//! | MONO_HLSB | `(x + y*stride)/8` | bit `7 - (x & 7)` |
//! | MONO_HMSB | `(x + y*stride)/8` | bit `x & 7` |
//! | GS2_HMSB | `(x + y*stride)/4` | bits `(x & 3)*2 ..+2` |
//! | GS4_HMSB | `(x + y*stride)/2` | bits `(1 - (x & 1))*4 ..+4` |
//! | GS8 | `x + y*stride` | whole byte |
//! | RGB565 | `(x + y*stride)*2` | little-endian 16-bit word |

use crate::format::PixelFormat;

/// Location of one pixel inside a packed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PixelAddress {
    /// Index of the (first) byte holding the pixel
    pub byte: usize,
    /// Bit offset of the field inside that byte
    pub shift: u8,
    /// Field width in bits (16 for RGB565, which spans two bytes)
    pub bits: u8,
}

impl PixelAddress {
    /// Unshifted mask covering the field within one byte.
    pub const fn mask(&self) -> u8 {
        match self.bits {
            1 => 0x01,
            2 => 0x03,
            4 => 0x0F,
            _ => 0xFF,
        }
    }

    /// Extract the field from the byte that holds it.
    pub const fn read(&self, byte: u8) -> u8 {
        (byte >> self.shift) & self.mask()
    }

    /// Replace the field in `byte` with the low bits of `value`.
    pub const fn write(&self, byte: u8, value: u8) -> u8 {
        let mask = self.mask() << self.shift;
        (byte & !mask) | ((value & self.mask()) << self.shift)
    }
}

/// Locate pixel `(x, y)` for `format` with the given stride.
///
/// Returns `None` only when the byte index overflows `usize`; indices past the
/// end of a real buffer are the caller's to reject.
pub fn locate(format: PixelFormat, x: usize, y: usize, stride: usize) -> Option<PixelAddress> {
    let linear = || y.checked_mul(stride)?.checked_add(x);
    // x % 8 etc. are below 8, so the narrowing casts are lossless
    #[allow(clippy::cast_possible_truncation, clippy::arithmetic_side_effects)]
    let addr = match format {
        PixelFormat::MonoVlsb => PixelAddress {
            byte: (y / 8).checked_mul(stride)?.checked_add(x)?,
            shift: (y % 8) as u8,
            bits: 1,
        },
        PixelFormat::MonoHlsb => PixelAddress {
            byte: linear()? / 8,
            shift: 7 - (x % 8) as u8,
            bits: 1,
        },
        PixelFormat::MonoHmsb => PixelAddress {
            byte: linear()? / 8,
            shift: (x % 8) as u8,
            bits: 1,
        },
        PixelFormat::Grey2Hmsb => PixelAddress {
            byte: linear()? / 4,
            shift: (x % 4) as u8 * 2,
            bits: 2,
        },
        PixelFormat::Grey4Hmsb => PixelAddress {
            byte: linear()? / 2,
            shift: (1 - (x % 2) as u8) * 4,
            bits: 4,
        },
        PixelFormat::Grey8 => PixelAddress {
            byte: linear()?,
            shift: 0,
            bits: 8,
        },
        PixelFormat::Rgb565 => PixelAddress {
            byte: linear()?.checked_mul(2)?,
            shift: 0,
            bits: 16,
        },
    };
    Some(addr)
}

/// Bytes needed to hold a `width` × `height` image at `stride` in `format`.
pub fn buffer_len(format: PixelFormat, width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }
    let last = locate(format, width.checked_sub(1)?, height.checked_sub(1)?, stride)?;
    let span = if format == PixelFormat::Rgb565 { 2 } else { 1 };
    last.byte.checked_add(span)
}
