//! Packed pixel formats for low-depth framebuffers
//!
//! Static description of the seven on-wire pixel encodings a greyplane surface
//! can address, plus the integer-only arithmetic shared by every accessor.
//!
//! # Features
//!
//! - **no_std compatible** - no allocation, no floating point
//! - **Format table** - bits per pixel and normalized↔native conversion per format
//! - **Fixed-point division** - [`byte_div`] replaces `/17`, `/85` and `/255`
//! - **Ordered dither** - 2-phase checkerboard perturbation
//! - **Addressing** - byte index and bit field of any pixel, testable without a buffer
//!
//! # Example
//!
//! ```
//! use greyplane_format::{locate, PixelFormat};
//!
//! let grey2 = PixelFormat::Grey2Hmsb;
//! assert_eq!(grey2.bits_per_pixel(), 2);
//! assert_eq!(grey2.to_native(200), 2);
//! assert_eq!(grey2.to_normalized(2), 170);
//!
//! // Pixel (5, 1) of a 16-pixel-wide GS2 buffer: byte 5, bits 2..4
//! let addr = locate(grey2, 5, 1, 16).unwrap();
//! assert_eq!((addr.byte, addr.shift), (5, 2));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod addressing;
pub mod dither;
pub mod fixed;
mod format;

pub use addressing::{locate, PixelAddress};
pub use dither::{perturb, perturb_clamped, perturbation};
pub use fixed::{byte_div, clamp_normalized, mix};
pub use format::{to_native, to_normalized, FormatCode, PixelFormat};
