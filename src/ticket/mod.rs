//! # Ticket Composition
//!
//! The document model: a [`Ticket`] is an ordered sequence of [`Block`]s,
//! and a block wraps one or more printable elements plus trailing feed
//! spacing. Serialization is pure byte concatenation:
//!
//! ```text
//! ticket bytes = block1 ++ block2 ++ ... ++ blockN ++ CUT
//! block bytes  = element1 ++ element2 ++ ... ++ ESC J feed_points
//! ```
//!
//! The cut command is appended exactly once, after the last block. An
//! empty ticket serializes to just the cut command.
//!
//! ## Example
//!
//! ```
//! use boleta::ticket::{Block, Ticket};
//! use boleta::elements::Encoding;
//!
//! let ticket = Ticket::new()
//!     .add(Block::title("LA FONDA"))
//!     .add(Block::kv("Cafe", "2.50"))
//!     .add(Block::divider())
//!     .add(Block::qr("https://example.com/r/42"));
//!
//! let bytes = ticket.serialize(Encoding::Utf8);
//! assert_eq!(&bytes[bytes.len() - 3..], &[0x1D, 0x56, 0x00]);
//! ```

use crate::elements::{Blank, Divider, Encoding, Printable, QrCode, Text, TicketImage};
use crate::error::BoletaError;
use crate::protocol::commands;

/// Default vertical feed appended after a block, in motion units.
pub const DEFAULT_FEED_POINTS: u8 = 70;

/// A composed unit of one or more elements plus trailing feed spacing.
///
/// The feed command is appended exactly once, after all contained
/// elements' bytes, never between them. Blocks are immutable once built
/// and owned solely by the ticket that contains them.
pub struct Block {
    elements: Vec<Box<dyn Printable>>,
    feed_points: u8,
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Block")
            .field("elements", &self.elements.len())
            .field("feed_points", &self.feed_points)
            .finish()
    }
}

impl Block {
    /// Block around a single element with the default feed spacing.
    pub fn new(element: impl Printable + 'static) -> Self {
        Self::with_feed(element, DEFAULT_FEED_POINTS)
    }

    /// Block around a single element with explicit feed spacing.
    pub fn with_feed(element: impl Printable + 'static, feed_points: u8) -> Self {
        Self {
            elements: vec![Box::new(element)],
            feed_points,
        }
    }

    /// Block around an ordered group of elements sharing one trailing feed.
    pub fn group(elements: Vec<Box<dyn Printable>>) -> Self {
        Self {
            elements,
            feed_points: DEFAULT_FEED_POINTS,
        }
    }

    /// One blank line's worth of space.
    pub fn blank() -> Self {
        Self::new(Blank)
    }

    /// `lines` blank lines' worth of space.
    ///
    /// The feed total is `lines * DEFAULT_FEED_POINTS` and must stay in
    /// the u8 domain; a line count that would overflow is rejected here,
    /// at construction, rather than silently wrapped.
    pub fn blank_lines(lines: u8) -> Result<Self, BoletaError> {
        let feed = DEFAULT_FEED_POINTS
            .checked_mul(lines)
            .ok_or(BoletaError::FeedOverflow {
                lines,
                points_per_line: DEFAULT_FEED_POINTS,
            })?;
        Ok(Self::with_feed(Blank, feed))
    }

    /// Title text block (centered, emphasized, double size).
    pub fn title(content: impl Into<String>) -> Self {
        Self::new(Text::title(content))
    }

    /// Plain text block.
    pub fn plain_text(content: impl Into<String>) -> Self {
        Self::new(Text::new(content))
    }

    /// Block from a pre-styled [`Text`] element.
    pub fn text(text: Text) -> Self {
        Self::new(text)
    }

    /// Key/value row block.
    pub fn kv(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Text::kv(key, value))
    }

    /// Dashed dividing line block.
    pub fn divider() -> Self {
        Self::new(Divider::default())
    }

    /// Dividing line from a custom repeat character.
    pub fn dividing(character: char) -> Self {
        Self::new(Divider::new(character))
    }

    /// QR code block.
    pub fn qr(content: impl Into<String>) -> Self {
        Self::new(QrCode::new(content))
    }

    /// Image block.
    pub fn image(image: TicketImage) -> Self {
        Self::new(image)
    }

    /// Feed spacing appended after this block's content.
    pub fn feed_points(&self) -> u8 {
        self.feed_points
    }
}

impl Printable for Block {
    fn data(&self, encoding: Encoding) -> Vec<u8> {
        let mut out = Vec::new();
        for element in &self.elements {
            out.extend(element.data(encoding));
        }
        out.extend(commands::feed(self.feed_points));
        out
    }
}

/// The full printable document: an ordered sequence of blocks.
///
/// Serialization order equals block order, with a single trailing cut
/// command. Serialization is deterministic, performs no I/O, and cannot
/// fail for a well-formed ticket.
#[derive(Default)]
pub struct Ticket {
    blocks: Vec<Block>,
}

impl Ticket {
    /// An empty ticket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block (builder style).
    pub fn add(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Append a block in place.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Serialize the whole document to one printer byte stream: each
    /// block's bytes in order, then the cut command.
    pub fn serialize(&self, encoding: Encoding) -> Vec<u8> {
        let mut out = Vec::new();
        for block in &self.blocks {
            out.extend(block.data(encoding));
        }
        out.extend_from_slice(&commands::CUT);
        out
    }
}
