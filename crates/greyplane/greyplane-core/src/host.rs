//! Host framebuffer capability
//!
//! A host framebuffer is an externally owned drawing object (an interpreter's
//! framebuffer, a display driver's RAM mirror, ...) that declares its format
//! and geometry, lends its backing bytes, and can read and write single pixels
//! in its own native encoding.
//!
//! [`HostObject`] is the looser handle a caller may pass in: it may or may not
//! be a framebuffer, and binding fails with [`Error::TypeMismatch`](crate::Error::TypeMismatch)
//! when it is not.

use greyplane_format::FormatCode;

/// A framebuffer owned outside this crate.
pub trait HostFramebuffer {
    /// Declared pixel format (may be a code this crate does not know).
    fn format(&self) -> FormatCode;

    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Row stride; 0 means "same as width".
    fn stride(&self) -> u32;

    /// Backing bytes for reading, or `None` if they cannot be lent.
    fn buffer(&self) -> Option<&[u8]>;

    /// Backing bytes for reading and writing, or `None` if they cannot be lent.
    fn buffer_mut(&mut self) -> Option<&mut [u8]>;

    /// Read pixel `(x, y)` as a native value.
    fn get(&self, x: i32, y: i32) -> u32;

    /// Write pixel `(x, y)` as a native value.
    fn set(&mut self, x: i32, y: i32, native: u32);
}

/// Any object a caller may try to bind or blit from.
pub trait HostObject {
    /// View this object as a framebuffer, if it is one.
    fn as_framebuffer(&self) -> Option<&dyn HostFramebuffer>;

    /// Mutable view of this object as a framebuffer, if it is one.
    fn as_framebuffer_mut(&mut self) -> Option<&mut dyn HostFramebuffer>;
}
