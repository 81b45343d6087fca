//! SSD1306-class controller commands
//!
//! The panel is driven without the controller's own greyscale support: every
//! sub-frame re-sends all pages of one bit-plane. While the pages are being
//! written the multiplex ratio is cut to `park_lines` and the display offset
//! pushed off the top (parking), so the half-written plane is never scanned
//! out. The run block then restores the full multiplex, plus overscan rows
//! that stretch the time each plane stays lit, and sets that plane's contrast.

use crate::config::DisplayConfig;

/// Columns of the controller's display RAM; narrower panels are centred.
pub const CONTROLLER_COLUMNS: u32 = 128;

/// Extra multiplex rows scanned after the visible ones in the run block.
pub const OVERSCAN_LINES: u32 = 12;

/// Display offset used while parked.
pub const PARK_OFFSET: u8 = 4;

/// Length of the initialisation block.
pub const INIT_LEN: usize = 33;

/// Controller command codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Horizontal / vertical addressing mode: 1 data byte.
    AddressingMode = 0x20,
    /// Column address window: 2 data bytes (start, end).
    ColumnAddress = 0x21,
    /// Page address window: 2 data bytes (start, end).
    PageAddress = 0x22,
    /// Display start line 0.
    StartLine = 0x40,
    /// Contrast: 1 data byte.
    Contrast = 0x81,
    /// Charge pump: 1 data byte.
    ChargePump = 0x8D,
    /// Segment remap: column 127 is SEG0.
    SegmentRemap = 0xA1,
    /// Output follows RAM content.
    ResumeFromRam = 0xA4,
    /// Non-inverted display.
    NormalDisplay = 0xA6,
    /// Multiplex ratio: 1 data byte (lines - 1).
    Multiplex = 0xA8,
    /// Internal current reference: 1 data byte.
    InternalIref = 0xAD,
    /// Display off (sleep).
    DisplayOff = 0xAE,
    /// Display on.
    DisplayOn = 0xAF,
    /// COM scan direction, normal.
    ComScanNormal = 0xC0,
    /// Display offset: 1 data byte.
    DisplayOffset = 0xD3,
    /// Clock divide ratio / oscillator frequency: 1 data byte.
    ClockDivide = 0xD5,
    /// Pre-charge period: 1 data byte.
    PreCharge = 0xD9,
    /// COM pin configuration: 1 data byte.
    ComPins = 0xDA,
    /// VCOMH deselect level: 1 data byte.
    VcomhDeselect = 0xDB,
}

fn lines(n: u32) -> u8 {
    u8::try_from(n).unwrap_or(u8::MAX)
}

/// Initialisation block for the panel geometry in `config`.
///
/// Starts with the display off and ends with it on. For the default 72×40
/// panel the RAM window is columns 28..=99, pages 0..=4.
#[rustfmt::skip]
pub fn init_block(config: &DisplayConfig) -> [u8; INIT_LEN] {
    let column_start = CONTROLLER_COLUMNS.saturating_sub(config.width) / 2;
    let column_end = column_start
        .saturating_add(config.width)
        .saturating_sub(1);
    let page_end = config.page_count().saturating_sub(1);

    [
        Command::DisplayOff as u8,
        Command::ClockDivide as u8, 0xF0,
        Command::Multiplex as u8, lines(config.height.saturating_sub(1)),
        Command::DisplayOffset as u8, 0x00,
        Command::StartLine as u8,
        // 7.5 V
        Command::ChargePump as u8, 0x14,
        // horizontal
        Command::AddressingMode as u8, 0x00,
        Command::SegmentRemap as u8,
        Command::ComScanNormal as u8,
        Command::ComPins as u8, 0x12,
        // 240 µA
        Command::InternalIref as u8, 0x30,
        Command::Contrast as u8, 0x01,
        Command::PreCharge as u8, 0x11,
        Command::VcomhDeselect as u8, 0x20,
        Command::ResumeFromRam as u8,
        Command::NormalDisplay as u8,
        Command::ColumnAddress as u8, lines(column_start), lines(column_end),
        Command::PageAddress as u8, 0, lines(page_end),
        Command::DisplayOn as u8,
    ]
}

/// Shrink the scanned area to `park_lines` rows, off the top of the panel.
pub fn park_block(park_lines: u8) -> [u8; 4] {
    [
        Command::Multiplex as u8,
        park_lines.saturating_sub(1),
        Command::DisplayOffset as u8,
        PARK_OFFSET,
    ]
}

/// Restore the full scan with overscan and set the plane's contrast.
pub fn run_block(contrast: u8, height: u32) -> [u8; 6] {
    let multiplex = height.saturating_add(OVERSCAN_LINES).saturating_sub(1);
    [
        Command::Contrast as u8,
        contrast,
        Command::DisplayOffset as u8,
        0,
        Command::Multiplex as u8,
        lines(multiplex),
    ]
}
