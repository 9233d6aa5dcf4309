//! Error types for xfixes
//!
//! Provides a unified error type for registration, cookie handling and the
//! event dump reader. Nothing in this crate aborts on a protocol problem:
//! every failure is turned into one of these values at the component that
//! detected it.

use thiserror::Error;

/// Result type alias using XFixesError
pub type Result<T> = std::result::Result<T, XFixesError>;

/// Unified error type for xfixes operations
#[derive(Debug, Error)]
pub enum XFixesError {
    // -------------------------------------------------------------------------
    // Registration Errors
    // -------------------------------------------------------------------------
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("No private extension slot available for close notification")]
    NoExtensionSlot,

    #[error("Extension {name} is not present on this connection")]
    ExtensionMissing { name: String },

    // -------------------------------------------------------------------------
    // Event Errors
    // -------------------------------------------------------------------------
    #[error("Wrong extension opcode {found} (registered opcode is {expected})")]
    OpcodeMismatch { expected: u8, found: u8 },

    #[error("Unknown event type {0}")]
    UnknownEvent(u8),

    #[error("Unknown generic event type {0}")]
    UnknownGenericEvent(u16),

    #[error("Cookie carries no payload")]
    MissingPayload,

    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Tooling Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid event dump: {0}")]
    InvalidDump(String),
}

/// Failure reported by the connection transport during a request/reply pair
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The connection went away before the reply arrived
    #[error("connection closed before reply arrived")]
    NoReply,

    /// The server answered the request with an error packet
    #[error("server returned error code {code}")]
    Server { code: u8 },

    #[error("transport IO error: {0}")]
    Io(#[from] std::io::Error),
}
