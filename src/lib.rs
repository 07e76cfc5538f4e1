//! # Boleta - ESC/POS Ticket Printing Library
//!
//! Boleta composes receipt-style "tickets" out of heterogeneous elements
//! (text, QR codes, images, dividers, blank space), serializes them into
//! one ESC/POS byte stream, and delivers that stream to a networked
//! thermal printer over TCP. It provides:
//!
//! - **Document model**: tickets built from blocks of printable elements,
//!   with per-block feed spacing and a single trailing paper cut
//! - **Protocol implementation**: ESC/POS command builders
//! - **Transport**: a TCP client with an explicit connection lifecycle,
//!   state-change notifications, and a blocking print operation
//!
//! ## Quick Start
//!
//! ```no_run
//! use boleta::elements::Encoding;
//! use boleta::ticket::{Block, Ticket};
//! use boleta::transport::{ConnectionState, TcpTransport};
//!
//! // Compose a ticket
//! let ticket = Ticket::new()
//!     .add(Block::title("LA FONDA"))
//!     .add(Block::divider())
//!     .add(Block::kv("Cafe", "2.50"))
//!     .add(Block::qr("https://example.com/r/42"));
//!
//! // Open a connection and watch its lifecycle
//! let mut printer = TcpTransport::new();
//! printer.on_connection_state_change(|state| eprintln!("printer: {:?}", state));
//! printer.connect("192.168.1.50", "9100")?;
//!
//! // Once the handler reports Ready, send the serialized ticket
//! while printer.connection_state() != Some(ConnectionState::Ready) {
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! printer.print(&ticket.serialize(Encoding::Utf8))?;
//! # Ok::<(), boleta::BoletaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ticket`] | Ticket/Block document model and serialization |
//! | [`elements`] | Printable elements (text, QR, image, divider, blank) |
//! | [`protocol`] | ESC/POS command builders |
//! | [`transport`] | TCP printer transport |
//! | [`templates`] | Ready-made demo tickets |
//! | [`error`] | Error types |
//!
//! ## Scope
//!
//! The wire format is raw ESC/POS with no framing or acknowledgment;
//! whatever the printer does with the stream is its own business. There
//! is no printer discovery, no Bluetooth/USB transport, and no TLS (a
//! trusted local network is assumed). Persisting "last connected" style
//! flags is the host application's job, driven by the state-change
//! handler.

pub mod elements;
pub mod error;
pub mod protocol;
pub mod templates;
pub mod ticket;
pub mod transport;

// Re-exports for convenience
pub use error::BoletaError;
pub use ticket::{Block, Ticket};
pub use transport::{ConnectionState, TcpTransport};
