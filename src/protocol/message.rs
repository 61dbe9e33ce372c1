//! Message definitions
//!
//! The in-memory representation of one protocol exchange.

use crate::error::{KvError, Result};

/// Whether a message travels client → server or server → client.
///
/// Exactly one direction bit must be set on the wire; a payload with both
/// or neither fails decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Request,
    Response,
}

/// The four cache operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
    Stats,
    Exit,
}

impl Operation {
    /// Parse an operation token from a text surface (ASCII line, CLI).
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "get" => Ok(Operation::Get),
            "set" => Ok(Operation::Set),
            "stats" => Ok(Operation::Stats),
            "exit" => Ok(Operation::Exit),
            other => Err(KvError::UnsupportedOperation(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Stats => "stats",
            Operation::Exit => "exit",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One protocol exchange, request or response.
///
/// `key` is meaningful only on Get/Set requests; responses carry an empty
/// key slot. `value` holds the value to store on Set requests and a
/// human-readable result string on every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub direction: Direction,
    pub operation: Operation,
    pub key: String,
    pub value: String,
}

impl Message {
    /// Build a client request
    pub fn request(operation: Operation, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            direction: Direction::Request,
            operation,
            key: key.into(),
            value: value.into(),
        }
    }

    /// Build a server response; the key slot is unused on responses
    pub fn response(operation: Operation, value: impl Into<String>) -> Self {
        Self {
            direction: Direction::Response,
            operation,
            key: String::new(),
            value: value.into(),
        }
    }
}
