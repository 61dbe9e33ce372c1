//! Error types for lrukv
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using KvError
pub type Result<T> = std::result::Result<T, KvError>;

/// Unified error type for lrukv operations
#[derive(Debug, Error)]
pub enum KvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Codec Errors (decode side)
    // -------------------------------------------------------------------------
    #[error("bad magic in flags field: 0x{flags:04x}")]
    BadMagic { flags: u16 },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("unknown operation bits: 0x{bits:04x}")]
    UnknownOperation { bits: u16 },

    #[error("invalid direction bits: 0x{bits:04x}")]
    InvalidDirection { bits: u16 },

    // -------------------------------------------------------------------------
    // Codec Errors (encode side)
    // -------------------------------------------------------------------------
    #[error("{field} too long to encode: {len} bytes (max {max})")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("request frame too large: {len} bytes (max {max})")]
    FrameTooLarge { len: usize, max: usize },

    // -------------------------------------------------------------------------
    // Text-surface Errors (ASCII line, CLI)
    // -------------------------------------------------------------------------
    #[error("unsupported operation: {0:?}")]
    UnsupportedOperation(String),

    // -------------------------------------------------------------------------
    // Protocol / Network Errors
    // -------------------------------------------------------------------------
    #[error("protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),
}
