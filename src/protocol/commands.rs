//! # ESC/POS Command Builders
//!
//! This module implements the subset of the ESC/POS protocol needed for
//! ticket printing: initialization, text styling, paper feed, raster
//! graphics, and the paper cut.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`
//! - Two bytes: `ESC @`
//! - Multi-byte with parameters: `ESC J n`, `GS v 0 m xL xH yL yH data...`
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
///
/// Most ESC/POS commands begin with ESC (0x1B). This byte signals the start
/// of a control sequence rather than printable text.
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Prefix for character size, raster graphics, and cutter commands.
/// Hex: 0x1D, Decimal: 29
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print and advance one line
///
/// Prints any data in the line buffer and advances paper by the current
/// line spacing amount.
pub const LF: u8 = 0x0A;

/// # Paper Cut (GS V 0)
///
/// The fixed 3-byte full-cut command terminating every ticket.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 0   |
/// | Hex     | 1D 56 00 |
/// | Decimal | 29 86 0  |
pub const CUT: [u8; 3] = [GS, b'V', 0x00];

// ============================================================================
// INITIALIZATION AND FEED
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Resets the printer to its power-on default state: clears the print
/// buffer and resets text formatting, character size, and alignment.
///
/// ## Example
///
/// ```
/// use boleta::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

/// # Print and Feed Paper (ESC J n)
///
/// Prints the line buffer and feeds paper forward by `n` motion units
/// (typically 1/203 inch each). This is the "feed points" command appended
/// after every ticket block.
///
/// | Format  | Bytes   |
/// |---------|---------|
/// | ASCII   | ESC J n |
/// | Hex     | 1B 4A n |
///
/// ## Example
///
/// ```
/// use boleta::protocol::commands;
///
/// assert_eq!(commands::feed(70), vec![0x1B, 0x4A, 70]);
/// ```
#[inline]
pub fn feed(n: u8) -> Vec<u8> {
    vec![ESC, b'J', n]
}

/// # Full Cut (GS V 0)
///
/// Builder form of [`CUT`]. Appended exactly once, at the end of a ticket.
#[inline]
pub fn cut() -> Vec<u8> {
    CUT.to_vec()
}

// ============================================================================
// TEXT STYLING
// ============================================================================

/// Horizontal alignment for text and raster lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// # Select Justification (ESC a n)
///
/// Applies to everything printed after it until changed, so styled
/// elements reset alignment to left when they finish.
///
/// | n | Alignment |
/// |---|-----------|
/// | 0 | Left      |
/// | 1 | Center    |
/// | 2 | Right     |
#[inline]
pub fn align(alignment: Alignment) -> Vec<u8> {
    let n = match alignment {
        Alignment::Left => 0,
        Alignment::Center => 1,
        Alignment::Right => 2,
    };
    vec![ESC, b'a', n]
}

/// # Emphasis On/Off (ESC E n)
///
/// Turns bold printing on (`n = 1`) or off (`n = 0`).
#[inline]
pub fn bold(on: bool) -> Vec<u8> {
    vec![ESC, b'E', on as u8]
}

/// # Select Character Size (GS ! n)
///
/// Width and height multipliers from 1 to 8. The multiplier minus one is
/// packed into one byte: width in the high nibble, height in the low.
/// Out-of-range multipliers are clamped.
///
/// ## Example
///
/// ```
/// use boleta::protocol::commands;
///
/// // Double width, double height
/// assert_eq!(commands::char_size(2, 2), vec![0x1D, 0x21, 0x11]);
/// // Normal
/// assert_eq!(commands::char_size(1, 1), vec![0x1D, 0x21, 0x00]);
/// ```
#[inline]
pub fn char_size(width: u8, height: u8) -> Vec<u8> {
    let w = width.clamp(1, 8) - 1;
    let h = height.clamp(1, 8) - 1;
    vec![GS, b'!', (w << 4) | h]
}

// ============================================================================
// RASTER GRAPHICS
// ============================================================================

/// # Print Raster Bit Image (GS v 0)
///
/// Emits a monochrome bitmap, one bit per dot, MSB first, rows padded to
/// whole bytes. QR codes and ticket images are printed through this
/// command.
///
/// | Format | Bytes                         |
/// |--------|-------------------------------|
/// | Hex    | 1D 76 30 00 xL xH yL yH data  |
///
/// ## Parameters
///
/// - `width_bytes`: row width in bytes (dots / 8, rounded up)
/// - `height`: number of rows
/// - `data`: `width_bytes * height` bitmap bytes
///
/// `data` shorter than the declared dimensions would desynchronize the
/// printer's command parser, so the declared dimensions are always derived
/// from the actual buffer by the callers in this crate.
#[inline]
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + data.len());
    out.extend_from_slice(&[GS, b'v', b'0', 0x00]);
    out.extend_from_slice(&u16_le(width_bytes));
    out.extend_from_slice(&u16_le(height));
    out.extend_from_slice(data);
    out
}

/// Encode a u16 value as little-endian bytes [low, high].
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
