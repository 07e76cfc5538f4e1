//! # Error Types
//!
//! This module defines error types used throughout the boleta library.

use thiserror::Error;

/// Main error type for boleta operations.
#[derive(Debug, Error)]
pub enum BoletaError {
    /// The supplied port does not parse to a valid, non-zero port number.
    ///
    /// Raised synchronously by [`connect`](crate::transport::TcpTransport::connect)
    /// before any socket is created or state notification fires.
    #[error("Invalid port: {0:?}")]
    InvalidPort(String),

    /// `print` was called with no connection, or with a connection that is
    /// not in the [`Ready`](crate::transport::ConnectionState::Ready) state.
    ///
    /// Raised synchronously; no I/O is attempted.
    #[error("Printer is not connected")]
    NotConnected,

    /// The underlying send reported a network-level failure.
    ///
    /// Surfaced as the outcome of the blocking `print` call.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A blank block's line count would push its feed points outside the
    /// 0-255 domain. Rejected at block construction time.
    #[error("Feed overflow: {lines} lines at {points_per_line} feed points per line")]
    FeedOverflow { lines: u8, points_per_line: u8 },

    /// Image decoding or loading error.
    #[error("Image error: {0}")]
    Image(String),

    /// Catch-all for caller-contract violations, e.g. the connection worker
    /// disappearing at send time without a teardown.
    #[error("Unknown printer error")]
    Unknown,
}
