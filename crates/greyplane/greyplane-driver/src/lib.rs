//! Greyscale on a 1 bpp OLED
//!
//! Drives an SSD1306-class controller over SPI and fakes several grey levels
//! by sending one bit-plane of a [`GreyContext`](greyplane_core::GreyContext)
//! backbuffer per sub-frame, with each plane shown at a contrast a quarter of
//! the previous one's.
//!
//! # Features
//!
//! - **no_std, async** - built on `embedded-hal-async` `SpiDevice` and
//!   `embedded-hal` output pins; no concrete HAL is chosen
//! - **Presets** - [`DisplayConfig::preset`] picks format and grey depth from a
//!   bits-per-pixel budget
//! - **Viewports** - byte-aligned sub-rectangles of a framebuffer
//!
//! # Example
//!
//! ```no_run
//! # async fn demo<SPI, DC, RST, D>(spi: SPI, dc: DC, rst: RST, mut delay: D)
//! # -> Result<(), greyplane_driver::DriverError>
//! # where
//! #     SPI: embedded_hal_async::spi::SpiDevice,
//! #     DC: embedded_hal::digital::OutputPin,
//! #     RST: embedded_hal::digital::OutputPin,
//! #     D: embedded_hal_async::delay::DelayNs,
//! # {
//! use greyplane_core::GreyContext;
//! use greyplane_driver::{DisplayConfig, GreyDisplay};
//!
//! let config = DisplayConfig::preset(4);
//! let mut back = [0u8; 72 * 40 / 2];
//! let mut page = [0u8; 72];
//!
//! let mut display = GreyDisplay::new(spi, dc, rst, config);
//! let mut ctx = GreyContext::new();
//! display.attach(&mut ctx, &mut back)?;
//! display.init(&mut delay).await?;
//!
//! ctx.set_pixel(10, 10, 180);
//! loop {
//!     display.run_frame(&ctx, &mut page, &mut delay).await?;
//! }
//! # }
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod commands;
mod config;
mod driver;
pub mod sequencer;
mod viewport;

pub use config::{format_bpp, DisplayConfig};
pub use driver::{DriverError, FrameStatus, GreyDisplay};
pub use sequencer::{contrast_for_level, Sequencer};
pub use viewport::Viewport;
