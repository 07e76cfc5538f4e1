//! # Divider Element
//!
//! A horizontal rule built by repeating one character across the line.

use crate::protocol::commands::LF;

use super::{Encoding, Printable};

/// Default print head width in dots (58mm paper).
const DEFAULT_PRINT_DENSITY: u16 = 384;

/// Default character cell width in dots (Font A).
const DEFAULT_FONT_DENSITY: u16 = 12;

/// A dividing line: one character repeated to fill the printable width.
///
/// The repeat count is `print_density / font_density`, so 384 / 12 = 32
/// characters with the defaults.
#[derive(Debug, Clone)]
pub struct Divider {
    character: char,
    print_density: u16,
    font_density: u16,
}

impl Divider {
    /// Divider from a repeat character, using the default densities.
    pub fn new(character: char) -> Self {
        Self {
            character,
            print_density: DEFAULT_PRINT_DENSITY,
            font_density: DEFAULT_FONT_DENSITY,
        }
    }

    /// Divider with explicit print and font density, for wider printers
    /// or narrower fonts. A zero font density falls back to the default.
    pub fn with_density(character: char, print_density: u16, font_density: u16) -> Self {
        Self {
            character,
            print_density,
            font_density: if font_density == 0 {
                DEFAULT_FONT_DENSITY
            } else {
                font_density
            },
        }
    }

    fn repeat_count(&self) -> usize {
        (self.print_density / self.font_density) as usize
    }
}

impl Default for Divider {
    fn default() -> Self {
        Self::new('-')
    }
}

impl Printable for Divider {
    fn data(&self, encoding: Encoding) -> Vec<u8> {
        let line: String = std::iter::repeat(self.character)
            .take(self.repeat_count())
            .collect();
        let mut out = encoding.encode(&line);
        out.push(LF);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_divider_is_32_dashes() {
        let bytes = Divider::default().data(Encoding::Utf8);
        assert_eq!(bytes, format!("{}\n", "-".repeat(32)).into_bytes());
    }

    #[test]
    fn test_custom_density() {
        let bytes = Divider::with_density('=', 576, 12).data(Encoding::Utf8);
        assert_eq!(bytes, format!("{}\n", "=".repeat(48)).into_bytes());
    }

    #[test]
    fn test_zero_font_density_falls_back() {
        let bytes = Divider::with_density('*', 384, 0).data(Encoding::Utf8);
        assert_eq!(bytes, format!("{}\n", "*".repeat(32)).into_bytes());
    }
}
