//! Frame sequencing tests: bit-plane order, per-plane contrast, temporal
//! dither, vsync and backbuffer replacement, checked on the SPI wire.
//!
//! Run with: cargo test -p greyplane-driver --test frame_sequence

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};
use greyplane_core::{
    Error, FormatCode, GreyContext, HostFramebuffer, HostObject, PixelFormat,
};
use greyplane_driver::{DisplayConfig, DriverError, FrameStatus, GreyDisplay};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The three SPI expectations of one `SpiDevice::write(&data)` call.
fn spi_device_write(data: &[u8]) -> [SpiTransaction<u8>; 3] {
    [
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(data.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

/// SPI traffic of one sub-frame on a one-page, two-column panel.
fn frame_writes(page: [u8; 2], contrast: u8) -> Vec<SpiTransaction<u8>> {
    [
        spi_device_write(&[0xA8, 1, 0xD3, 4]),
        spi_device_write(&page),
        spi_device_write(&[0x81, contrast, 0xD3, 0, 0xA8, 19]),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// DC levels of `frames` sub-frames: command, data, command.
fn frame_dc(frames: usize) -> PinMock {
    let per_frame = [
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ];
    let all: Vec<_> = (0..frames).flat_map(|_| per_frame.clone()).collect();
    PinMock::new(&all)
}

/// 2×8 Grey8 panel.
fn tiny_config(grey_bits: u32, dither_bits: u32) -> DisplayConfig {
    DisplayConfig {
        width: 2,
        height: 8,
        format: PixelFormat::Grey8,
        grey_bits,
        dither_bits,
        ..DisplayConfig::default()
    }
}

/// A readable framebuffer of the same layout as the backbuffer.
struct Frontbuffer(Vec<u8>);

impl HostFramebuffer for Frontbuffer {
    fn format(&self) -> FormatCode {
        PixelFormat::Grey8.into()
    }
    fn width(&self) -> u32 {
        2
    }
    fn height(&self) -> u32 {
        8
    }
    fn stride(&self) -> u32 {
        2
    }
    fn buffer(&self) -> Option<&[u8]> {
        Some(&self.0)
    }
    fn buffer_mut(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.0)
    }
    fn get(&self, _x: i32, _y: i32) -> u32 {
        0
    }
    fn set(&mut self, _x: i32, _y: i32, _native: u32) {}
}

impl HostObject for Frontbuffer {
    fn as_framebuffer(&self) -> Option<&dyn HostFramebuffer> {
        Some(self)
    }
    fn as_framebuffer_mut(&mut self) -> Option<&mut dyn HostFramebuffer> {
        Some(self)
    }
}

struct NotAFramebuffer;

impl HostObject for NotAFramebuffer {
    fn as_framebuffer(&self) -> Option<&dyn HostFramebuffer> {
        None
    }
    fn as_framebuffer_mut(&mut self) -> Option<&mut dyn HostFramebuffer> {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// A contrast change mid-cycle scales the remaining planes of that cycle.
#[tokio::test]
async fn test_set_contrast_applies_to_next_run_block() {
    let expectations: Vec<_> = [255u8, 32, 8]
        .into_iter()
        .flat_map(|c| frame_writes([0, 0], c))
        .collect();
    let mut spi = SpiMock::new(&expectations);
    let mut dc = frame_dc(3);
    let mut rst = PinMock::new(&[]);

    let mut back = [0u8; 16];
    let mut ctx = GreyContext::new();
    let mut display = GreyDisplay::new(spi.clone(), dc.clone(), rst.clone(), tiny_config(3, 1));
    display.attach(&mut ctx, &mut back).unwrap();

    let mut page = [0u8; 2];
    display.render_frame(&ctx, &mut page).await.unwrap();
    display.set_contrast(128);
    assert_eq!(display.config().contrast, 128);
    display.render_frame(&ctx, &mut page).await.unwrap();
    let status = display.render_frame(&ctx, &mut page).await.unwrap();
    assert!(status.cycle_complete);

    spi.done();
    dc.done();
    rst.done();
}

/// Three planes at contrast 255 → 63 → 15, then the next cycle starts with
/// the opposite dither phase.
#[tokio::test]
async fn test_contrast_steps_per_plane() {
    let expectations: Vec<_> = [255u8, 63, 15, 255]
        .into_iter()
        .flat_map(|c| frame_writes([0, 0], c))
        .collect();
    let mut spi = SpiMock::new(&expectations);
    let mut dc = frame_dc(4);
    let mut rst = PinMock::new(&[]);

    let mut back = [0u8; 16];
    let mut ctx = GreyContext::new();
    let mut display = GreyDisplay::new(spi.clone(), dc.clone(), rst.clone(), tiny_config(3, 1));
    display.attach(&mut ctx, &mut back).unwrap();

    let mut page = [0u8; 2];
    let mut statuses = Vec::new();
    for _ in 0..4 {
        statuses.push(display.run_frame(&ctx, &mut page, &mut NoopDelay).await.unwrap());
    }
    assert_eq!(
        statuses,
        vec![
            FrameStatus { level: 0, phase: 1, cycle_complete: false },
            FrameStatus { level: 1, phase: 1, cycle_complete: false },
            FrameStatus { level: 2, phase: 1, cycle_complete: true },
            FrameStatus { level: 0, phase: -1, cycle_complete: false },
        ]
    );

    spi.done();
    dc.done();
    rst.done();
}

/// Mid grey (128) with amplitude 16 dithers into complementary columns, and
/// the checkerboard inverts between cycles.
#[tokio::test]
async fn test_temporal_dither_on_the_wire() {
    let expectations: Vec<_> = [
        ([0x55, 0xAA], 255),
        ([0xAA, 0x55], 63),
        ([0xAA, 0x55], 255),
        ([0x55, 0xAA], 63),
    ]
    .into_iter()
    .flat_map(|(page, c)| frame_writes(page, c))
    .collect();
    let mut spi = SpiMock::new(&expectations);
    let mut dc = frame_dc(4);
    let mut rst = PinMock::new(&[]);

    let mut back = [0u8; 16];
    let mut ctx = GreyContext::new();
    let mut display = GreyDisplay::new(spi.clone(), dc.clone(), rst.clone(), tiny_config(2, 1));
    display.attach(&mut ctx, &mut back).unwrap();
    assert!(display.show_bytes(&mut ctx, &[128; 16]));

    let mut page = [0u8; 2];
    for _ in 0..4 {
        display.render_frame(&ctx, &mut page).await.unwrap();
    }

    spi.done();
    dc.done();
    rst.done();
}

/// Without temporal dither the phase never flips.
#[tokio::test]
async fn test_fixed_phase_repeats_planes() {
    let expectations: Vec<_> = [([0x55, 0xAA], 255), ([0xAA, 0x55], 63), ([0x55, 0xAA], 255)]
        .into_iter()
        .flat_map(|(page, c)| frame_writes(page, c))
        .collect();
    let mut spi = SpiMock::new(&expectations);
    let mut dc = frame_dc(3);
    let mut rst = PinMock::new(&[]);

    let mut back = [128u8; 16];
    let mut ctx = GreyContext::new();
    let mut display = GreyDisplay::new(spi.clone(), dc.clone(), rst.clone(), tiny_config(2, 1));
    display.set_temporal_dither(false);
    display.attach(&mut ctx, &mut back).unwrap();

    let mut page = [0u8; 2];
    for _ in 0..3 {
        display.render_frame(&ctx, &mut page).await.unwrap();
    }
    assert_eq!(display.sequencer().phase(), 1);

    spi.done();
    dc.done();
    rst.done();
}

/// `wait_vsync` finishes the running cycle, after which `show` swaps in a
/// new image for the next one.
#[tokio::test]
async fn test_vsync_then_show() {
    let expectations: Vec<_> = [255u8, 63, 15]
        .into_iter()
        .flat_map(|c| frame_writes([0, 0], c))
        .chain(frame_writes([0xFF, 0xFF], 255))
        .collect();
    let mut spi = SpiMock::new(&expectations);
    let mut dc = frame_dc(4);
    let mut rst = PinMock::new(&[]);

    let mut back = [0u8; 16];
    let mut ctx = GreyContext::new();
    let mut display = GreyDisplay::new(spi.clone(), dc.clone(), rst.clone(), tiny_config(3, 0));
    display.attach(&mut ctx, &mut back).unwrap();

    let mut page = [0u8; 2];
    display.render_frame(&ctx, &mut page).await.unwrap();
    let waited = display.wait_vsync(&ctx, &mut page, &mut NoopDelay).await.unwrap();
    assert_eq!(waited, 2);
    assert_eq!(display.wait_vsync(&ctx, &mut page, &mut NoopDelay).await.unwrap(), 0);

    let front = Frontbuffer(vec![255; 16]);
    assert_eq!(display.show(&mut ctx, &front), Ok(true));
    display.render_frame(&ctx, &mut page).await.unwrap();

    spi.done();
    dc.done();
    rst.done();
}

#[test]
fn test_show_rejects_non_framebuffer() {
    let mut spi = SpiMock::new(&[]);
    let mut dc = PinMock::new(&[]);
    let mut rst = PinMock::new(&[]);

    let mut back = [0u8; 16];
    let mut ctx = GreyContext::new();
    let display = GreyDisplay::new(spi.clone(), dc.clone(), rst.clone(), tiny_config(2, 0));
    display.attach(&mut ctx, &mut back).unwrap();
    assert_eq!(
        display.show(&mut ctx, &NotAFramebuffer),
        Err(DriverError::Surface(Error::TypeMismatch))
    );

    spi.done();
    dc.done();
    rst.done();
}

#[test]
fn test_show_ignores_length_mismatch() {
    let mut back = [3u8; 16];
    let mut ctx = GreyContext::new();
    let display = GreyDisplay::new(
        SpiMock::<u8>::new(&[]),
        PinMock::new(&[]),
        PinMock::new(&[]),
        tiny_config(2, 0),
    );
    display.attach(&mut ctx, &mut back).unwrap();
    let front = Frontbuffer(vec![9; 8]);
    assert_eq!(display.show(&mut ctx, &front), Ok(false));
    assert_eq!(ctx.get_pixel(0, 0), 3);

    let (mut spi, mut dc, mut rst) = display.release();
    spi.done();
    dc.done();
    rst.done();
}

#[cfg(feature = "serde")]
#[test]
fn test_config_serde_round_trip() {
    let config = DisplayConfig::preset(2);
    let json = serde_json::to_string(&config).unwrap();
    let back: DisplayConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
