//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Payload Format (both directions)
//!
//! ```text
//! ┌───────────┬──────────────┬──────┬──────────────┬────────┐
//! │ Flags (2) │ Key len (2)  │ Key  │ Val len (2)  │ Value  │
//! └───────────┴──────────────┴──────┴──────────────┴────────┘
//! ```
//!
//! The 16-bit flags field carries a fixed magic pattern in its top bits,
//! one direction bit (request or response) and exactly one operation bit.
//!
//! ### Flags Field Layout
//! - 0x5400 under mask 0xFC00: magic, rejects non-protocol traffic
//! - 0x0100: REQUEST   0x0200: RESPONSE
//! - 0x0008: STATS     0x0004: SET     0x0002: GET     0x0001: EXIT
//!
//! ### Framing
//! ```text
//! client → server:  0xFF │ payload len (1, unsigned) │ payload
//! server → client:  payload len (4, big-endian signed) │ payload
//! ```
//!
//! Any first byte other than `0xFF` switches the connection into the
//! line-oriented ASCII mode, where that byte is already part of the line.

mod message;
mod codec;

pub use message::{Direction, Message, Operation};
pub use codec::{
    decode_message, encode_message, read_request, read_response, write_request, write_response,
    BINARY_MODE, FLAGS_SIZE, MAX_REQUEST_PAYLOAD,
};
