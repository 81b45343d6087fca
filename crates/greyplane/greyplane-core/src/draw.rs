//! embedded-graphics adapter
//!
//! Lets text, shapes and images from the embedded-graphics ecosystem be drawn
//! straight onto a bound [`Surface`] or [`GreyContext`]. Colours are [`Gray8`],
//! which maps one-to-one onto the normalized value range.

use core::convert::Infallible;

use embedded_graphics::pixelcolor::{Gray8, GrayColor};
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};

use crate::context::GreyContext;
use crate::surface::Surface;

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

impl DrawTarget for Surface<'_> {
    type Color = Gray8;
    type Error = Infallible;

    /// Pixels outside the declared `width × height` are dropped.
    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let width = i32::try_from(self.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.height()).unwrap_or(i32::MAX);
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 || point.x >= width || point.y >= height {
                continue;
            }
            self.set_pixel(point.x, point.y, color.luma());
        }
        Ok(())
    }
}

impl OriginDimensions for Surface<'_> {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

// ---------------------------------------------------------------------------
// GreyContext
// ---------------------------------------------------------------------------

impl DrawTarget for GreyContext<'_> {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.surface_mut().draw_iter(pixels)
    }
}

impl OriginDimensions for GreyContext<'_> {
    fn size(&self) -> Size {
        self.surface().size()
    }
}
