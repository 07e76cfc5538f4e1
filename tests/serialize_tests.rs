//! # Serialization Tests
//!
//! End-to-end properties of the ticket byte stream: blocks concatenate in
//! order, each block ends with its feed command, and the document ends
//! with exactly one cut command.

use pretty_assertions::assert_eq;

use image::{DynamicImage, GrayImage};

use boleta::BoletaError;
use boleta::elements::{Divider, Encoding, Printable, QrCode, Text, TicketImage};
use boleta::protocol::commands::{self, CUT};
use boleta::ticket::{Block, DEFAULT_FEED_POINTS, Ticket};

/// Count occurrences of a byte pattern in a stream.
fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}

#[test]
fn empty_ticket_is_exactly_the_cut_command() {
    let bytes = Ticket::new().serialize(Encoding::Utf8);
    assert_eq!(bytes, vec![0x1D, 0x56, 0x00]);
}

#[test]
fn ticket_is_block_bytes_in_order_plus_cut() {
    let blocks = || {
        vec![
            Block::title("LA FONDA"),
            Block::kv("Cafe", "2.50"),
            Block::divider(),
            Block::qr("https://example.com/r/42"),
            Block::blank(),
        ]
    };

    let mut ticket = Ticket::new();
    for block in blocks() {
        ticket.push(block);
    }
    let bytes = ticket.serialize(Encoding::Utf8);

    let mut expected = Vec::new();
    for block in blocks() {
        expected.extend(block.data(Encoding::Utf8));
    }
    expected.extend_from_slice(&CUT);

    assert_eq!(bytes, expected);
}

#[test]
fn cut_appears_once_per_ticket_not_per_block() {
    let bytes = Ticket::new()
        .add(Block::plain_text("a"))
        .add(Block::plain_text("b"))
        .add(Block::plain_text("c"))
        .serialize(Encoding::Utf8);

    assert_eq!(count_occurrences(&bytes, &CUT), 1);
    assert_eq!(&bytes[bytes.len() - 3..], &CUT);
}

#[test]
fn block_feed_comes_after_all_elements_never_between() {
    let block = Block::group(vec![
        Box::new(Text::new("one")),
        Box::new(Divider::default()),
        Box::new(Text::new("two")),
    ]);
    let bytes = block.data(Encoding::Utf8);

    let feed = commands::feed(DEFAULT_FEED_POINTS);
    assert_eq!(count_occurrences(&bytes, &feed), 1);
    assert_eq!(&bytes[bytes.len() - feed.len()..], &feed[..]);
}

#[test]
fn blank_block_feed_scales_with_line_count() {
    for lines in 1..=3u8 {
        let block = Block::blank_lines(lines).unwrap();
        let bytes = block.data(Encoding::Utf8);
        assert_eq!(bytes, commands::feed(DEFAULT_FEED_POINTS * lines));
    }
}

#[test]
fn out_of_range_blank_lines_are_rejected() {
    // 4 * 70 = 280 leaves the u8 feed domain
    for lines in [4u8, 10, 255] {
        assert!(matches!(
            Block::blank_lines(lines),
            Err(BoletaError::FeedOverflow { .. })
        ));
    }
}

#[test]
fn unencodable_element_serializes_to_feed_only() {
    // A QR payload past any version's capacity yields empty element bytes;
    // the block still contributes its feed and the ticket still cuts.
    let block = Block::qr("x".repeat(8000));
    assert_eq!(block.data(Encoding::Utf8), commands::feed(DEFAULT_FEED_POINTS));

    let bytes = Ticket::new()
        .add(Block::qr("x".repeat(8000)))
        .serialize(Encoding::Utf8);
    let mut expected = commands::feed(DEFAULT_FEED_POINTS);
    expected.extend_from_slice(&CUT);
    assert_eq!(bytes, expected);
}

#[test]
fn over_tall_image_serializes_to_feed_only() {
    // More rows than the GS v 0 header's u16 can declare. A wrapped row
    // count against a full-height payload would desynchronize the printer
    // parser, so the element yields nothing and the block is feed-only.
    let img = DynamicImage::ImageLuma8(GrayImage::new(8, 70_000));
    let bytes = Block::image(TicketImage::new(img)).data(Encoding::Utf8);
    assert_eq!(bytes, commands::feed(DEFAULT_FEED_POINTS));
}

#[test]
fn serialization_is_deterministic() {
    let build = || {
        Ticket::new()
            .add(Block::title("DETERMINISM"))
            .add(Block::kv("left", "right"))
            .add(Block::qr("same payload"))
            .serialize(Encoding::Utf8)
    };
    assert_eq!(build(), build());
}

#[test]
fn qr_element_bytes_are_framed_as_raster() {
    let bytes = QrCode::new("https://example.com").data(Encoding::Utf8);
    // centered GS v 0 raster, alignment restored afterwards
    assert_eq!(&bytes[..3], commands::align(commands::Alignment::Center).as_slice());
    assert_eq!(&bytes[3..7], &[0x1D, 0x76, 0x30, 0x00]);
    assert_eq!(
        &bytes[bytes.len() - 3..],
        commands::align(commands::Alignment::Left).as_slice()
    );
}
