//! Rendering context
//!
//! [`GreyContext`] bundles the one bound [`Surface`] with the page generator's
//! configuration, so a caller (or a display driver) holds a single value
//! instead of process-wide state.

use greyplane_format::FormatCode;

use crate::host::HostObject;
use crate::page::{PageConfig, PageGenerator};
use crate::surface::{Surface, SurfaceInfo};
use crate::Error;

/// Surface plus page generator.
#[derive(Default)]
pub struct GreyContext<'a> {
    surface: Surface<'a>,
    generator: PageGenerator,
}

impl<'a> GreyContext<'a> {
    /// Unbound surface, default page geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbound surface, given page geometry.
    pub fn with_config(config: PageConfig) -> Self {
        Self {
            surface: Surface::new(),
            generator: PageGenerator::new(config),
        }
    }

    /// Bound surface.
    pub fn surface(&self) -> &Surface<'a> {
        &self.surface
    }

    /// Mutable bound surface.
    pub fn surface_mut(&mut self) -> &mut Surface<'a> {
        &mut self.surface
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    /// See [`Surface::bind`].
    pub fn bind(
        &mut self,
        format: impl Into<FormatCode>,
        stride: u32,
        width: u32,
        height: u32,
        buffer: &'a mut [u8],
    ) {
        self.surface.bind(format, stride, width, height, buffer);
    }

    /// See [`Surface::bind_host`].
    ///
    /// # Errors
    ///
    /// As [`Surface::bind_host`].
    pub fn bind_host(&mut self, object: &'a mut dyn HostObject) -> Result<(), Error> {
        self.surface.bind_host(object)
    }

    /// Bind `buffer` as the back buffer using the configured page geometry.
    ///
    /// # Errors
    ///
    /// [`Error::BufferTooSmall`] if `buffer` is shorter than the configured
    /// width; the previous binding is kept.
    pub fn set_backbuffer(
        &mut self,
        buffer: &'a mut [u8],
        format: impl Into<FormatCode>,
    ) -> Result<(), Error> {
        let config = *self.generator.config();
        let required = usize::try_from(config.width).unwrap_or(usize::MAX);
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                actual: buffer.len(),
            });
        }
        self.surface
            .bind(format, 0, config.width, config.height, buffer);
        Ok(())
    }

    /// See [`Surface::unbind`].
    pub fn unbind(&mut self) {
        self.surface.unbind();
    }

    /// See [`Surface::blit`].
    ///
    /// # Errors
    ///
    /// As [`Surface::blit`].
    pub fn blit(&mut self, source: &dyn HostObject) -> Result<bool, Error> {
        self.surface.blit(source)
    }

    /// Geometry of the bound surface.
    pub fn info(&self) -> SurfaceInfo {
        self.surface.info()
    }

    // -----------------------------------------------------------------------
    // Pixels
    // -----------------------------------------------------------------------

    /// See [`Surface::get_pixel`].
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        self.surface.get_pixel(x, y)
    }

    /// See [`Surface::set_pixel`].
    pub fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        self.surface.set_pixel(x, y, value);
    }

    /// See [`Surface::blend_pixel`].
    pub fn blend_pixel(&mut self, x: i32, y: i32, value: u8, alpha: u8) {
        self.surface.blend_pixel(x, y, value, alpha);
    }

    /// Ordered-dither strength for the 1 bpp and host-object writers.
    pub fn set_dither(&mut self, strength: i32) {
        self.surface.set_dither(strength);
    }

    /// Current ordered-dither strength.
    pub fn dither(&self) -> i32 {
        self.surface.dither()
    }

    // -----------------------------------------------------------------------
    // Pages
    // -----------------------------------------------------------------------

    /// Update page geometry; absent or negative values leave a field unchanged.
    pub fn configure(
        &mut self,
        width: Option<i32>,
        height: Option<i32>,
        grey_bits: Option<i32>,
        dither_bits: Option<i32>,
    ) {
        self.generator
            .config_mut()
            .update(width, height, grey_bits, dither_bits);
    }

    /// Replace the page configuration wholesale.
    pub fn set_page_config(&mut self, config: PageConfig) {
        *self.generator.config_mut() = config;
    }

    /// Current page configuration.
    pub fn page_config(&self) -> &PageConfig {
        self.generator.config()
    }

    /// Generate one page of bit-plane `level` from the bound surface.
    ///
    /// # Errors
    ///
    /// [`Error::BufferTooSmall`] if `out` is shorter than the configured width.
    pub fn generate_page(
        &self,
        out: &mut [u8],
        page: u32,
        level: u32,
        dither_phase: i32,
    ) -> Result<(), Error> {
        self.generator
            .generate_page(&self.surface, out, page, level, dither_phase)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, clippy::unwrap_used)]
    use super::*;
    use greyplane_format::PixelFormat;

    #[test]
    fn test_backbuffer_uses_page_geometry() {
        let mut buf = [0u8; 8 * 8];
        let mut ctx = GreyContext::new();
        ctx.configure(Some(8), Some(8), None, Some(0));
        ctx.set_backbuffer(&mut buf, PixelFormat::Grey8).unwrap();

        let info = ctx.info();
        assert_eq!((info.width, info.height, info.stride), (8, 8, 8));
        assert_eq!(info.format, Some(FormatCode(6)));
    }

    #[test]
    fn test_backbuffer_shorter_than_width_is_rejected() {
        let mut buf = [0u8; 10];
        let mut ctx = GreyContext::new();
        let err = ctx.set_backbuffer(&mut buf, PixelFormat::Grey8);
        assert_eq!(err, Err(Error::BufferTooSmall { required: 72, actual: 10 }));
        assert!(!ctx.surface().is_bound());
    }

    #[test]
    fn test_page_from_bound_surface() {
        let mut buf = [0u8; 8 * 8];
        let mut ctx = GreyContext::with_config(PageConfig {
            width: 8,
            height: 8,
            grey_bits: 2,
            dither_bits: 0,
        });
        ctx.set_backbuffer(&mut buf, PixelFormat::Grey8).unwrap();
        // Column 3 white; row 7 (bottom) of column 5 white
        for y in 0..8 {
            ctx.set_pixel(3, y, 255);
        }
        ctx.set_pixel(5, 7, 255);

        let mut page = [0u8; 8];
        ctx.generate_page(&mut page, 0, 0, 1).unwrap();
        assert_eq!(page, [0, 0, 0, 0xFF, 0, 0x01, 0, 0]);
    }

    #[test]
    fn test_dither_passthrough() {
        let mut ctx = GreyContext::new();
        ctx.set_dither(3);
        assert_eq!(ctx.dither(), 3);
        assert_eq!(ctx.surface().dither(), 3);
    }
}
