//! # ESC/POS Protocol Layer
//!
//! Command builders for the ESC/POS command language spoken by most
//! networked thermal receipt printers (Epson TM series and compatibles).
//!
//! Commands are plain byte sequences; this layer does no I/O. The
//! [`commands`] module contains the individual builders.

pub mod commands;

pub use commands::{CUT, ESC, GS, LF};
