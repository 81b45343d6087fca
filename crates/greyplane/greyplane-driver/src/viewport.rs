//! Byte-aligned sub-rectangles of a framebuffer
//!
//! A viewport lets a caller draw into part of a framebuffer through a surface
//! of its own. Packed formats can only start a row on a whole byte, so the
//! left edge is snapped down and the right edge up to the next byte boundary
//! before clipping to the framebuffer.

use greyplane_core::{FormatCode, Surface};

/// An aligned, clipped sub-rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Viewport {
    /// Left edge in framebuffer pixels
    pub x: u32,
    /// Top edge in framebuffer pixels
    pub y: u32,
    /// Width after alignment and clipping
    pub width: u32,
    /// Height after clipping
    pub height: u32,
    /// Row stride of the parent framebuffer, in pixels
    pub stride: u32,
    /// Byte offset of `(x, y)` in the parent buffer
    pub offset: usize,
}

impl Viewport {
    /// Align and clip `w × h` at `(x, y)` inside an `fb_width × fb_height`
    /// framebuffer of `bpp` bits per pixel and `stride` pixels per row.
    ///
    /// Returns `None` when nothing of the rectangle is left.
    // Edge arithmetic widens i32/u32 inputs to i64 and cannot overflow; `unit`
    // is at least 1. The offset product uses checked ops.
    #[allow(clippy::too_many_arguments, clippy::arithmetic_side_effects)]
    pub fn new(
        fb_width: u32,
        fb_height: u32,
        stride: u32,
        bpp: u32,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    ) -> Option<Self> {
        let bpp = i64::from(bpp.max(1));
        // Pixels per byte; formats of a byte or more need no snapping
        let unit = (8 / bpp).max(1);

        let (x, y, w, h) = (i64::from(x), i64::from(y), i64::from(w), i64::from(h));
        let x0 = (x.div_euclid(unit) * unit).max(0);
        let y0 = y.max(0);
        let x1 = ((x + w + unit - 1).div_euclid(unit) * unit).min(i64::from(fb_width));
        let y1 = (y + h).min(i64::from(fb_height));

        let width = u32::try_from(x1 - x0).ok().filter(|w| *w > 0)?;
        let height = u32::try_from(y1 - y0).ok().filter(|h| *h > 0)?;
        let bits = y0
            .checked_mul(i64::from(stride))?
            .checked_add(x0)?
            .checked_mul(bpp)?;
        let offset = usize::try_from(bits / 8).ok()?;

        Some(Self {
            x: u32::try_from(x0).ok()?,
            y: u32::try_from(y0).ok()?,
            width,
            height,
            stride,
            offset,
        })
    }

    /// Bind `surface` to this viewport of `buffer`, the parent framebuffer's bytes.
    ///
    /// Returns false, leaving `surface` untouched, if `buffer` ends before the
    /// viewport's first byte.
    pub fn bind<'a>(
        &self,
        surface: &mut Surface<'a>,
        format: impl Into<FormatCode>,
        buffer: &'a mut [u8],
    ) -> bool {
        match buffer.get_mut(self.offset..) {
            Some(tail) => {
                surface.bind(format, self.stride, self.width, self.height, tail);
                true
            }
            None => false,
        }
    }
}
