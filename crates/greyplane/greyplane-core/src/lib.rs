//! Greyscale rendering onto low-depth displays
//!
//! `greyplane-core` binds one pixel buffer as a drawing [`Surface`], offers
//! normalized 0–255 pixel access on it regardless of the packed format, and
//! turns the result into 1 bpp bit-plane pages that a monochrome controller
//! can cycle through to show several grey levels.
//!
//! # Example
//!
//! ```
//! use greyplane_core::{GreyContext, PageConfig, PixelFormat};
//!
//! let mut back = [0u8; 16 * 8];
//! let mut ctx = GreyContext::with_config(PageConfig {
//!     width: 16,
//!     height: 8,
//!     grey_bits: 2,
//!     dither_bits: 0,
//! });
//! ctx.set_backbuffer(&mut back, PixelFormat::Grey8)?;
//! ctx.set_pixel(0, 7, 0xC0);
//!
//! // Plane 0 (MSB) and plane 1 both light the bottom-left pixel
//! let mut page = [0u8; 16];
//! ctx.generate_page(&mut page, 0, 0, 1)?;
//! assert_eq!(page[0], 0x01);
//! ctx.generate_page(&mut page, 0, 1, 1)?;
//! assert_eq!(page[0], 0x01);
//! # Ok::<(), greyplane_core::Error>(())
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

mod context;
mod draw;
mod error;
mod host;
pub mod page;
pub mod surface;

pub use context::GreyContext;
pub use error::Error;
pub use host::{HostFramebuffer, HostObject};
pub use page::{PageConfig, PageGenerator, PixelSource};
pub use surface::{Strategy, Surface, SurfaceInfo};

pub use greyplane_format::{FormatCode, PixelFormat};
