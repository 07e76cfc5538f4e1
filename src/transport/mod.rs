//! # Printer Transport Layer
//!
//! Communication backends for delivering a serialized ticket to a printer.
//!
//! ## Available Transports
//!
//! - [`tcp`]: network printers over raw TCP (port 9100 convention)
//!
//! Networked receipt printers speak no framing or acknowledgment protocol
//! of their own: the transport's job is an explicit connection lifecycle
//! and a blocking, all-or-nothing send of one finished byte stream.

pub mod tcp;

pub use tcp::{ConnectionState, TcpTransport};
