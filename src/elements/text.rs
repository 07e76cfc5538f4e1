//! # Text Element
//!
//! Styled text lines: plain text, centered double-size titles, and
//! key/value rows (key left, value right, padded to the line width).

use crate::protocol::commands::{self, Alignment};

use super::{Encoding, Printable};

/// Characters per line in Font A on a 58mm printer (384 dots / 12-dot font).
const LINE_WIDTH_CHARS: usize = 32;

/// A line of text with optional styling.
///
/// Styling commands are emitted before the content and reset after it, so
/// one element never leaks alignment, emphasis, or size into the next.
///
/// ## Example
///
/// ```
/// use boleta::elements::Text;
///
/// let heading = Text::new("OPEN LATE").center().bold();
/// let shout = Text::new("GRACIAS").size(2, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Text {
    content: String,
    align: Alignment,
    bold: bool,
    size: (u8, u8),
}

impl Text {
    /// Plain text, left aligned, normal size.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            align: Alignment::Left,
            bold: false,
            size: (1, 1),
        }
    }

    /// Title text: centered, emphasized, double width and height.
    pub fn title(content: impl Into<String>) -> Self {
        Self::new(content).center().bold().size(2, 2)
    }

    /// Key/value row: key at the left edge, value at the right edge,
    /// space-padded to the line width. A pair that fills the line exactly
    /// prints flush with no gap; a pair too wide to fit keeps a single
    /// separating space and wraps at the printer.
    pub fn kv(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        let used = key.chars().count() + value.chars().count();
        let gap = LINE_WIDTH_CHARS.checked_sub(used).unwrap_or(1);
        Self::new(format!("{}{}{}", key, " ".repeat(gap), value))
    }

    /// Center this line.
    pub fn center(mut self) -> Self {
        self.align = Alignment::Center;
        self
    }

    /// Right-align this line.
    pub fn right(mut self) -> Self {
        self.align = Alignment::Right;
        self
    }

    /// Emphasize this line.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Set character width/height multipliers (1-8, clamped).
    pub fn size(mut self, width: u8, height: u8) -> Self {
        self.size = (width, height);
        self
    }
}

impl Printable for Text {
    fn data(&self, encoding: Encoding) -> Vec<u8> {
        let mut out = Vec::new();

        if self.align != Alignment::Left {
            out.extend(commands::align(self.align));
        }
        if self.bold {
            out.extend(commands::bold(true));
        }
        if self.size != (1, 1) {
            out.extend(commands::char_size(self.size.0, self.size.1));
        }

        out.extend(encoding.encode(&self.content));
        out.push(commands::LF);

        // Reset what was set
        if self.size != (1, 1) {
            out.extend(commands::char_size(1, 1));
        }
        if self.bold {
            out.extend(commands::bold(false));
        }
        if self.align != Alignment::Left {
            out.extend(commands::align(Alignment::Left));
        }

        out
    }
}
