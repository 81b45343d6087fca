//! The bound drawing surface
//!
//! A [`Surface`] borrows a packed pixel buffer (directly, or through a host
//! framebuffer object) and exposes three pixel operations in the normalized
//! 0–255 range: [`get_pixel`](Surface::get_pixel), [`set_pixel`](Surface::set_pixel)
//! and [`blend_pixel`](Surface::blend_pixel).
//!
//! The accessor [`Strategy`] is chosen once at bind time from the pixel format:
//!
//! | Format | get | set / blend |
//! |--------|-----|-------------|
//! | MONO_* | bit test | dithered threshold; blend commits when alpha > 127 |
//! | GS2 / GS4 | field × 17 or 85 | quantized write; blend mixes then re-quantizes |
//! | GS8 | byte | byte; blend mixes |
//! | RGB565 | luma-like scalar of the word | through the host object |
//! | unknown, host-bound | host `get` | host `set` |
//! | unknown, raw / unbound | 0 | no-op |
//!
//! Coordinates are not clipped to the declared geometry. A coordinate inside
//! the buffer but outside `width × height` addresses whatever byte the packing
//! arithmetic names; one that falls outside the buffer reads 0 and is never
//! written.

use greyplane_format::{
    locate, mix, perturb, perturb_clamped, to_native, to_normalized, FormatCode, PixelAddress,
    PixelFormat,
};

use crate::host::{HostFramebuffer, HostObject};
use crate::Error;

/// Pixel accessor selected at bind time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Strategy {
    /// Nothing bound, or an unknown format on a raw buffer
    Unbound,
    /// 1 bpp vertical bytes
    MonoVlsb,
    /// 1 bpp horizontal bytes, MSB first
    MonoHlsb,
    /// 1 bpp horizontal bytes, LSB first
    MonoHmsb,
    /// 2 bpp grey
    Grey2,
    /// 4 bpp grey
    Grey4,
    /// 8 bpp grey
    Grey8,
    /// Native reads, writes through the host object
    Rgb565,
    /// Every access through the host object's pixel methods
    Delegate,
}

impl Strategy {
    /// Native strategy for a format; unknown formats get [`Strategy::Unbound`].
    pub const fn for_format(format: Option<PixelFormat>) -> Self {
        match format {
            Some(PixelFormat::MonoVlsb) => Self::MonoVlsb,
            Some(PixelFormat::MonoHlsb) => Self::MonoHlsb,
            Some(PixelFormat::MonoHmsb) => Self::MonoHmsb,
            Some(PixelFormat::Grey2Hmsb) => Self::Grey2,
            Some(PixelFormat::Grey4Hmsb) => Self::Grey4,
            Some(PixelFormat::Grey8) => Self::Grey8,
            Some(PixelFormat::Rgb565) => Self::Rgb565,
            None => Self::Unbound,
        }
    }

    /// Short name for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::MonoVlsb => "mono-vlsb",
            Self::MonoHlsb => "mono-hlsb",
            Self::MonoHmsb => "mono-hmsb",
            Self::Grey2 => "grey2",
            Self::Grey4 => "grey4",
            Self::Grey8 => "grey8",
            Self::Rgb565 => "rgb565",
            Self::Delegate => "delegate",
        }
    }
}

/// Snapshot of the bound geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SurfaceInfo {
    /// Declared format code, `None` when unbound
    pub format: Option<FormatCode>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row stride; 0 when the format cannot be addressed natively
    pub stride: u32,
    /// Length of the bound buffer in bytes
    pub len: usize,
}

enum Backing<'a> {
    Detached,
    Raw(&'a mut [u8]),
    Host(&'a mut dyn HostFramebuffer),
}

/// The currently bound drawing target.
///
/// Holds the ordered-dither strength too: it outlives rebinding and applies to
/// the 1 bpp writers and the host-object writers.
pub struct Surface<'a> {
    backing: Backing<'a>,
    format: Option<FormatCode>,
    width: u32,
    height: u32,
    stride: u32,
    strategy: Strategy,
    dither: i32,
}

impl Default for Surface<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Surface<'a> {
    /// An unbound surface with dithering disabled.
    pub const fn new() -> Self {
        Self {
            backing: Backing::Detached,
            format: None,
            width: 0,
            height: 0,
            stride: 0,
            strategy: Strategy::Unbound,
            dither: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Binding
    // -----------------------------------------------------------------------

    /// Bind a raw buffer.
    ///
    /// `stride` 0 means "same as width". Never fails: an unknown format yields
    /// an inert surface (reads 0, ignores writes) with stride 0. The buffer
    /// length is not checked against the geometry.
    pub fn bind(
        &mut self,
        format: impl Into<FormatCode>,
        stride: u32,
        width: u32,
        height: u32,
        buffer: &'a mut [u8],
    ) {
        let code = format.into();
        if self.install(code, stride, width, height) == Strategy::Unbound {
            tracing::warn!(format = code.0, "unknown pixel format, surface is inert");
        }
        self.backing = Backing::Raw(buffer);
    }

    /// Bind a host framebuffer object.
    ///
    /// Known formats use the native accessors on the host's bytes; unknown
    /// formats fall back to the host's own `get` / `set`.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if `object` is not a framebuffer,
    /// [`Error::BufferUnavailable`] if it cannot lend its bytes for writing.
    /// The surface is unchanged on error.
    pub fn bind_host(&mut self, object: &'a mut dyn HostObject) -> Result<(), Error> {
        let host = object.as_framebuffer_mut().ok_or(Error::TypeMismatch)?;
        if host.buffer_mut().is_none() {
            return Err(Error::BufferUnavailable);
        }

        let code = host.format();
        let strategy = self.install(code, host.stride(), host.width(), host.height());
        if strategy == Strategy::Unbound {
            tracing::debug!(format = code.0, "unknown host format, delegating pixel access");
            self.strategy = Strategy::Delegate;
        }
        self.backing = Backing::Host(host);
        Ok(())
    }

    /// Drop the binding. The dither strength is kept.
    pub fn unbind(&mut self) {
        self.backing = Backing::Detached;
        self.format = None;
        self.width = 0;
        self.height = 0;
        self.stride = 0;
        self.strategy = Strategy::Unbound;
        tracing::debug!("surface unbound");
    }

    fn install(&mut self, code: FormatCode, stride: u32, width: u32, height: u32) -> Strategy {
        let strategy = Strategy::for_format(code.format());
        self.format = Some(code);
        self.width = width;
        self.height = height;
        self.strategy = strategy;
        self.stride = if strategy == Strategy::Unbound {
            0
        } else {
            stride.max(width).max(1)
        };
        tracing::debug!(
            format = code.0,
            width,
            height,
            stride = self.stride,
            strategy = strategy.name(),
            "surface bound"
        );
        strategy
    }

    // -----------------------------------------------------------------------
    // Blit
    // -----------------------------------------------------------------------

    /// Copy a host framebuffer's bytes verbatim into the bound buffer.
    ///
    /// Returns `Ok(false)` without touching anything when the lengths differ
    /// or nothing is bound; no format conversion is attempted.
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] if `source` is not a framebuffer,
    /// [`Error::BufferUnavailable`] if its bytes cannot be read.
    pub fn blit(&mut self, source: &dyn HostObject) -> Result<bool, Error> {
        let host = source.as_framebuffer().ok_or(Error::TypeMismatch)?;
        let bytes = host.buffer().ok_or(Error::BufferUnavailable)?;
        Ok(self.blit_bytes(bytes))
    }

    /// Copy `source` into the bound buffer if the lengths match exactly.
    pub fn blit_bytes(&mut self, source: &[u8]) -> bool {
        if matches!(self.backing, Backing::Detached) {
            return false;
        }
        let dest = self.bytes_mut();
        if dest.len() != source.len() {
            tracing::debug!(
                source = source.len(),
                dest = dest.len(),
                "blit skipped: length mismatch"
            );
            return false;
        }
        dest.copy_from_slice(source);
        true
    }

    // -----------------------------------------------------------------------
    // Pixel access
    // -----------------------------------------------------------------------

    /// Read pixel `(x, y)` as a normalized value.
    pub fn get_pixel(&self, x: i32, y: i32) -> u8 {
        match self.strategy {
            Strategy::Unbound => 0,
            Strategy::Delegate => self.delegate_get(x, y),
            _ => self.native_get(x, y),
        }
    }

    /// Write a normalized value to pixel `(x, y)`.
    pub fn set_pixel(&mut self, x: i32, y: i32, value: u8) {
        match self.strategy {
            Strategy::Unbound => {}
            Strategy::MonoVlsb | Strategy::MonoHlsb | Strategy::MonoHmsb => {
                let on = perturb(value, self.dither, x, y) > 127;
                self.write_field(x, y, u32::from(on));
            }
            Strategy::Grey2 | Strategy::Grey4 | Strategy::Grey8 => {
                self.write_field(x, y, to_native(value, self.pixel_format()));
            }
            Strategy::Rgb565 | Strategy::Delegate => self.delegate_set(x, y, value),
        }
    }

    /// Composite a normalized value over pixel `(x, y)` with `alpha` 0–255.
    pub fn blend_pixel(&mut self, x: i32, y: i32, value: u8, alpha: u8) {
        match self.strategy {
            Strategy::Unbound => {}
            Strategy::MonoVlsb | Strategy::MonoHlsb | Strategy::MonoHmsb => {
                if alpha > 127 {
                    self.set_pixel(x, y, value);
                }
            }
            Strategy::Grey2 | Strategy::Grey4 | Strategy::Grey8 => {
                if alpha == 0 {
                    return;
                }
                let c = if alpha < 255 {
                    mix(value, self.native_get(x, y), alpha)
                } else {
                    value
                };
                self.write_field(x, y, to_native(c, self.pixel_format()));
            }
            Strategy::Rgb565 | Strategy::Delegate => {
                if alpha == 0 {
                    return;
                }
                let c = if alpha < 255 {
                    mix(value, self.delegate_get(x, y), alpha)
                } else {
                    value
                };
                self.delegate_set(x, y, c);
            }
        }
    }

    // -----------------------------------------------------------------------
    // State
    // -----------------------------------------------------------------------

    /// Set the ordered-dither strength; 0 disables it.
    pub fn set_dither(&mut self, strength: i32) {
        self.dither = strength;
    }

    /// Current ordered-dither strength.
    pub fn dither(&self) -> i32 {
        self.dither
    }

    /// Active accessor.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// True while a buffer or host object is bound.
    pub fn is_bound(&self) -> bool {
        !matches!(self.backing, Backing::Detached)
    }

    /// Declared format code, `None` when unbound.
    pub fn format(&self) -> Option<FormatCode> {
        self.format
    }

    /// Known pixel format, `None` when unbound or unknown.
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        self.format.and_then(FormatCode::format)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Geometry snapshot.
    pub fn info(&self) -> SurfaceInfo {
        SurfaceInfo {
            format: self.format,
            width: self.width,
            height: self.height,
            stride: self.stride,
            len: self.bytes().len(),
        }
    }

    /// Bound bytes; empty when unbound.
    pub fn bytes(&self) -> &[u8] {
        match &self.backing {
            Backing::Detached => &[],
            Backing::Raw(buf) => &**buf,
            Backing::Host(host) => host.buffer().unwrap_or_default(),
        }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        match &mut self.backing {
            Backing::Detached => Default::default(),
            Backing::Raw(buf) => &mut **buf,
            Backing::Host(host) => host.buffer_mut().unwrap_or_default(),
        }
    }

    // -----------------------------------------------------------------------
    // Native accessors
    // -----------------------------------------------------------------------

    fn locate(&self, x: i32, y: i32) -> Option<PixelAddress> {
        let format = self.pixel_format()?;
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let stride = usize::try_from(self.stride).ok()?;
        locate(format, x, y, stride)
    }

    fn native_get(&self, x: i32, y: i32) -> u8 {
        let Some(addr) = self.locate(x, y) else {
            return 0;
        };
        let bytes = self.bytes();
        let native = if addr.bits == 16 {
            match bytes.get(addr.byte..addr.byte.saturating_add(2)) {
                Some(&[lo, hi]) => u32::from(u16::from_le_bytes([lo, hi])),
                _ => return 0,
            }
        } else {
            match bytes.get(addr.byte) {
                Some(byte) => u32::from(addr.read(*byte)),
                None => return 0,
            }
        };
        to_normalized(native, self.pixel_format())
    }

    fn write_field(&mut self, x: i32, y: i32, native: u32) {
        let Some(addr) = self.locate(x, y) else {
            return;
        };
        // RGB565 words are only ever written by the host object
        if addr.bits == 16 {
            return;
        }
        let field = u8::try_from(native & u32::from(addr.mask())).unwrap_or_default();
        if let Some(byte) = self.bytes_mut().get_mut(addr.byte) {
            *byte = addr.write(*byte, field);
        }
    }

    // -----------------------------------------------------------------------
    // Delegate accessors
    // -----------------------------------------------------------------------

    fn delegate_get(&self, x: i32, y: i32) -> u8 {
        match &self.backing {
            Backing::Host(host) => to_normalized(host.get(x, y), self.pixel_format()),
            _ => 0,
        }
    }

    fn delegate_set(&mut self, x: i32, y: i32, value: u8) {
        let c = perturb_clamped(value, self.dither, x, y);
        let native = to_native(c, self.pixel_format());
        if let Backing::Host(host) = &mut self.backing {
            host.set(x, y, native);
        }
    }
}
