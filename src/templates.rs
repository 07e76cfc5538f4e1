//! # Ticket Templates
//!
//! Ready-made tickets for the CLI and for exercising the element set
//! against a real printer.

use chrono::Local;

use crate::elements::Text;
use crate::ticket::{Block, Ticket};

/// A small café receipt touching every text element variant.
pub fn demo_ticket() -> Ticket {
    Ticket::new()
        .add(Block::title("LA FONDA"))
        .add(Block::plain_text("Calle Falsa 123"))
        .add(Block::text(
            Text::new(Local::now().format("%Y-%m-%d %H:%M").to_string()).center(),
        ))
        .add(Block::divider())
        .add(Block::kv("Cafe con leche", "2.50"))
        .add(Block::kv("Tostada", "1.80"))
        .add(Block::kv("Zumo de naranja", "3.20"))
        .add(Block::divider())
        .add(Block::text(Text::kv("TOTAL", "7.50").bold()))
        .add(Block::blank())
        .add(Block::qr("https://example.com/ticket/0042"))
        .add(Block::text(Text::new("gracias por su visita").center()))
}

/// One plain-text line as a whole ticket. Handy for printer smoke tests.
pub fn text_ticket(line: impl Into<String>) -> Ticket {
    Ticket::new().add(Block::plain_text(line))
}

/// Names accepted by [`by_name`].
pub fn list_templates() -> Vec<&'static str> {
    vec!["demo"]
}

/// Look up a template by name.
pub fn by_name(name: &str) -> Option<Ticket> {
    match name {
        "demo" => Some(demo_ticket()),
        _ => None,
    }
}
