//! # Printable Elements
//!
//! Content units a ticket is composed from: text lines, QR codes, images,
//! dividers, and blank space. Each element produces its own raw command
//! bytes through the [`Printable`] trait; blocks and tickets concatenate
//! them (see [`crate::ticket`]).
//!
//! ## Design
//!
//! `Printable` is a single-method capability: bytes out, given a text
//! encoding. Element encoding is total by contract: an element that
//! cannot produce output (for example a QR payload too large for any QR
//! version) yields an empty byte sequence rather than an error, so ticket
//! serialization never fails.

mod divider;
mod image;
mod qr;
mod text;

pub use divider::Divider;
pub use image::TicketImage;
pub use qr::QrCode;
pub use text::Text;

/// Text encoding used when serializing a ticket.
///
/// Documents must be encoded once, uniformly. UTF-8 is the only supported
/// encoding; the enum is non-exhaustive so a code page variant could be
/// added without breaking callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Encoding {
    #[default]
    Utf8,
}

impl Encoding {
    /// Encode a string into printer bytes.
    #[inline]
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => text.as_bytes().to_vec(),
        }
    }
}

/// Trait for anything that can produce its raw encoded bytes.
///
/// Implementations are stateless once constructed and must be infallible:
/// if an element cannot encode, it returns an empty byte sequence.
pub trait Printable {
    /// Produce this element's command bytes using the given text encoding.
    fn data(&self, encoding: Encoding) -> Vec<u8>;
}

/// Blank space. Produces no content bytes; the vertical spacing comes
/// from the containing block's feed points.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blank;

impl Printable for Blank {
    fn data(&self, _encoding: Encoding) -> Vec<u8> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_encode() {
        assert_eq!(Encoding::Utf8.encode("abc"), b"abc".to_vec());
        assert_eq!(Encoding::Utf8.encode("café"), "café".as_bytes().to_vec());
    }

    #[test]
    fn test_blank_is_empty() {
        assert!(Blank.data(Encoding::Utf8).is_empty());
    }
}
