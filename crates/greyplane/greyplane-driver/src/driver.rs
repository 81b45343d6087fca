//! Greyscale OLED driver
//!
//! Async driver for a 1 bpp SSD1306-class controller (72×40 panel by default)
//! that shows a greyscale backbuffer by sending one bit-plane per sub-frame.
//!
//! # Wiring
//!
//! | Signal | Direction |
//! |--------|-----------|
//! | SCK / MOSI | Host → Display (the `SpiDevice`) |
//! | CS  | Managed by `SpiDevice` |
//! | DC  | Host → Display, low = command, high = data |
//! | RST | Host → Display, active low |
//!
//! # Frame loop
//!
//! ```text
//! park block (cmd) ─► page 0 .. page n (data) ─► run block (cmd) ─► wait frame period
//! ```
//!
//! The caller owns the loop: call [`GreyDisplay::run_frame`] (or
//! [`GreyDisplay::render_frame`] with its own pacing) forever, and replace the
//! backbuffer with [`GreyDisplay::show`] when a frame reports
//! `cycle_complete`, or after [`GreyDisplay::wait_vsync`].

use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use greyplane_core::{GreyContext, HostObject};

use crate::commands::{init_block, park_block, run_block, Command};
use crate::config::DisplayConfig;
use crate::sequencer::{contrast_for_level, Sequencer};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// SPI transfer failed
    Communication,
    /// DC or RST pin could not be driven
    Gpio,
    /// Page generation or backbuffer binding failed
    Surface(greyplane_core::Error),
}

impl From<greyplane_core::Error> for DriverError {
    fn from(e: greyplane_core::Error) -> Self {
        Self::Surface(e)
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Communication => write!(f, "Display communication error"),
            Self::Gpio => write!(f, "Display GPIO error"),
            Self::Surface(e) => write!(f, "Surface error: {e}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame status
// ---------------------------------------------------------------------------

/// What one sub-frame showed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStatus {
    /// Bit-plane that was sent
    pub level: u32,
    /// Dither phase it was generated with
    pub phase: i32,
    /// The grey cycle ended with this sub-frame
    pub cycle_complete: bool,
}

// ---------------------------------------------------------------------------
// Driver struct
// ---------------------------------------------------------------------------

/// Greyscale driver for an SSD1306-class OLED.
///
/// Generic over:
/// - `SPI`: an async [`embedded_hal_async::spi::SpiDevice`] (manages CS).
/// - `DC`: Data/Command [`embedded_hal::digital::OutputPin`].
/// - `RST`: Reset [`embedded_hal::digital::OutputPin`].
///
/// Pixel data lives in a [`GreyContext`] the caller owns; bind its backbuffer
/// with [`attach`](Self::attach).
pub struct GreyDisplay<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: RST,
    config: DisplayConfig,
    sequencer: Sequencer,
}

impl<SPI, DC, RST> GreyDisplay<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a driver; nothing is sent until [`init`](Self::init).
    pub fn new(spi: SPI, dc: DC, rst: RST, config: DisplayConfig) -> Self {
        Self {
            spi,
            dc,
            rst,
            sequencer: Sequencer::new(config.grey_bits, config.temporal_dither),
            config,
        }
    }

    /// Panel configuration.
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Position in the grey cycle.
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Contrast of the most significant plane, applied from the next sub-frame.
    pub fn set_contrast(&mut self, contrast: u8) {
        self.config.contrast = contrast;
    }

    /// Enable or disable the per-cycle dither phase flip.
    pub fn set_temporal_dither(&mut self, enabled: bool) {
        self.config.temporal_dither = enabled;
        self.sequencer.set_temporal_dither(enabled);
    }

    /// Give the driver back its bus and pins.
    pub fn release(self) -> (SPI, DC, RST) {
        (self.spi, self.dc, self.rst)
    }

    // -----------------------------------------------------------------------
    // Context setup
    // -----------------------------------------------------------------------

    /// Configure `ctx` for this panel and bind `backbuffer` as its surface.
    ///
    /// `backbuffer` should hold [`DisplayConfig::buffer_len`] bytes.
    ///
    /// # Errors
    ///
    /// [`DriverError::Surface`] if `backbuffer` is shorter than the panel width.
    pub fn attach<'a>(
        &self,
        ctx: &mut GreyContext<'a>,
        backbuffer: &'a mut [u8],
    ) -> Result<(), DriverError> {
        ctx.set_page_config(self.config.page_config());
        ctx.set_backbuffer(backbuffer, self.config.format)?;
        tracing::debug!(
            format = self.config.format.name(),
            width = self.config.width,
            height = self.config.height,
            grey_bits = self.config.grey_bits,
            "backbuffer attached"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Low-level SPI helpers
    // -----------------------------------------------------------------------

    /// DC low, then send `bytes` as one transfer.
    async fn send_commands(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        self.dc.set_low().map_err(|_| DriverError::Gpio)?;
        self.spi
            .write(bytes)
            .await
            .map_err(|_| DriverError::Communication)
    }

    // -----------------------------------------------------------------------
    // Initialisation
    // -----------------------------------------------------------------------

    /// Reset pulse, then the initialisation block. Restarts the grey cycle.
    pub async fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), DriverError> {
        self.rst.set_low().map_err(|_| DriverError::Gpio)?;
        delay.delay_ms(1).await;
        self.rst.set_high().map_err(|_| DriverError::Gpio)?;

        let block = init_block(&self.config);
        self.send_commands(&block).await?;
        self.sequencer.reset();
        tracing::debug!(
            width = self.config.width,
            height = self.config.height,
            "display initialised"
        );
        Ok(())
    }

    /// Turn the panel off.
    pub async fn shutdown(&mut self) -> Result<(), DriverError> {
        self.send_commands(&[Command::DisplayOff as u8]).await?;
        tracing::debug!("display off");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Send the next sub-frame: park, every page of the current bit-plane,
    /// then the run block with that plane's contrast.
    ///
    /// `page_buffer` is scratch space of at least the panel width.
    ///
    /// # Errors
    ///
    /// [`DriverError::Surface`] if `page_buffer` is too short, before anything
    /// is sent. SPI and GPIO failures leave the sequencer where it was.
    pub async fn render_frame(
        &mut self,
        ctx: &GreyContext<'_>,
        page_buffer: &mut [u8],
    ) -> Result<FrameStatus, DriverError> {
        let width = usize::try_from(self.config.width).unwrap_or(usize::MAX);
        if page_buffer.len() < width {
            return Err(greyplane_core::Error::BufferTooSmall {
                required: width,
                actual: page_buffer.len(),
            }
            .into());
        }

        let level = self.sequencer.level();
        let phase = self.sequencer.phase();

        self.send_commands(&park_block(self.config.park_lines))
            .await?;

        self.dc.set_high().map_err(|_| DriverError::Gpio)?;
        for page in 0..self.config.page_count() {
            ctx.generate_page(page_buffer, page, level, phase)?;
            let bytes = page_buffer.get(..width).unwrap_or_default();
            self.spi
                .write(bytes)
                .await
                .map_err(|_| DriverError::Communication)?;
        }

        let contrast = contrast_for_level(self.config.contrast, level);
        self.send_commands(&run_block(contrast, self.config.height))
            .await?;

        let cycle_complete = self.sequencer.advance();
        Ok(FrameStatus {
            level,
            phase,
            cycle_complete,
        })
    }

    /// [`render_frame`](Self::render_frame), then wait one frame period.
    pub async fn run_frame<D: DelayNs>(
        &mut self,
        ctx: &GreyContext<'_>,
        page_buffer: &mut [u8],
        delay: &mut D,
    ) -> Result<FrameStatus, DriverError> {
        let status = self.render_frame(ctx, page_buffer).await?;
        delay.delay_us(self.config.frame_period_us).await;
        Ok(status)
    }

    /// Run frames until the grey cycle is back at level 0.
    ///
    /// Returns the number of sub-frames sent; 0 if already there.
    pub async fn wait_vsync<D: DelayNs>(
        &mut self,
        ctx: &GreyContext<'_>,
        page_buffer: &mut [u8],
        delay: &mut D,
    ) -> Result<u32, DriverError> {
        let mut frames = 0u32;
        while !self.sequencer.at_cycle_start() {
            self.run_frame(ctx, page_buffer, delay).await?;
            frames = frames.saturating_add(1);
        }
        Ok(frames)
    }

    // -----------------------------------------------------------------------
    // Backbuffer updates
    // -----------------------------------------------------------------------

    /// Copy a framebuffer of identical layout into the backbuffer.
    ///
    /// Returns `Ok(false)` when the lengths differ. Calling this mid-cycle
    /// shows a mix of the old and new image until the cycle ends.
    ///
    /// # Errors
    ///
    /// [`DriverError::Surface`] if `source` is not a readable framebuffer.
    pub fn show(
        &self,
        ctx: &mut GreyContext<'_>,
        source: &dyn HostObject,
    ) -> Result<bool, DriverError> {
        self.note_mid_cycle();
        Ok(ctx.blit(source)?)
    }

    /// [`show`](Self::show) for raw bytes.
    pub fn show_bytes(&self, ctx: &mut GreyContext<'_>, source: &[u8]) -> bool {
        self.note_mid_cycle();
        ctx.surface_mut().blit_bytes(source)
    }

    fn note_mid_cycle(&self) {
        if !self.sequencer.at_cycle_start() {
            tracing::debug!(level = self.sequencer.level(), "backbuffer replaced mid-cycle");
        }
    }
}
