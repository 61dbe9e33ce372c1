//! Protocol codec
//!
//! Encoding and decoding for the wire protocol.
//!
//! ## Payload Format (both directions)
//!
//! ```text
//! ┌───────────┬─────────────┬──────┬─────────────┬────────┐
//! │ Flags (2) │ Key len (2) │ Key  │ Val len (2) │ Value  │
//! └───────────┴─────────────┴──────┴─────────────┴────────┘
//! ```
//!
//! All integers are big-endian. Key and value are UTF-8.
//!
//! ## Framing
//!
//! Requests travel as `0xFF | len (1 byte) | payload`, capping the request
//! payload at 255 bytes. Responses travel as `len (4 bytes, signed) |
//! payload`. The `0xFF` mode marker is consumed by the dispatcher before
//! [`read_request`] runs, so it never appears here on the read side.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{KvError, Result};
use super::{Direction, Message, Operation};

/// Size of the 16-bit flags field, the minimum decodable payload
pub const FLAGS_SIZE: usize = 2;

/// Mode marker selecting the binary protocol on a fresh connection
pub const BINARY_MODE: u8 = 0xFF;

/// Hard ceiling on a request payload, imposed by the 1-byte length prefix
pub const MAX_REQUEST_PAYLOAD: usize = u8::MAX as usize;

/// Fixed magic pattern in the top bits of the flags field
const MAGIC: u16 = 0x5400;

/// Mask isolating the magic bits
const MAGIC_MASK: u16 = 0xfc00;

const REQUEST: u16 = 0x0100;
const RESPONSE: u16 = 0x0200;

const STATS: u16 = 0x0008;
const SET: u16 = 0x0004;
const GET: u16 = 0x0002;
const EXIT: u16 = 0x0001;

const DIRECTION_MASK: u16 = REQUEST | RESPONSE;
const OPERATION_MASK: u16 = STATS | SET | GET | EXIT;

/// Longest string a 2-byte length prefix can carry
const MAX_FIELD_LEN: usize = u16::MAX as usize;

/// Largest payload a well-formed message can produce; response reads
/// reject lengths beyond this before allocating
const MAX_RESPONSE_PAYLOAD: usize = FLAGS_SIZE + 2 * (2 + MAX_FIELD_LEN);

// =============================================================================
// Payload Encoding/Decoding
// =============================================================================

/// Encode a message to a payload byte sequence
///
/// Format: flags (2) + length-prefixed key + length-prefixed value
pub fn encode_message(message: &Message) -> Result<Vec<u8>> {
    let mut flags = MAGIC;

    flags |= match message.direction {
        Direction::Request => REQUEST,
        Direction::Response => RESPONSE,
    };

    flags |= match message.operation {
        Operation::Stats => STATS,
        Operation::Set => SET,
        Operation::Get => GET,
        Operation::Exit => EXIT,
    };

    let mut buf =
        BytesMut::with_capacity(FLAGS_SIZE + 4 + message.key.len() + message.value.len());
    buf.put_u16(flags);
    put_field(&mut buf, "key", &message.key)?;
    put_field(&mut buf, "value", &message.value)?;

    Ok(buf.to_vec())
}

/// Decode a payload byte sequence back to a message
///
/// The magic pattern is validated before anything else; a payload with
/// well-formed string sections but wrong magic still fails. On a response
/// the key section is parsed and discarded (its slot is unused).
pub fn decode_message(bytes: &[u8]) -> Result<Message> {
    if bytes.len() < FLAGS_SIZE {
        return Err(KvError::MalformedFrame(format!(
            "payload too short: {} bytes (min {})",
            bytes.len(),
            FLAGS_SIZE
        )));
    }

    let mut buf = bytes;
    let flags = buf.get_u16();

    if flags & MAGIC_MASK != MAGIC {
        return Err(KvError::BadMagic { flags });
    }

    // Exactly one direction bit must be set
    let direction = match flags & DIRECTION_MASK {
        REQUEST => Direction::Request,
        RESPONSE => Direction::Response,
        bits => return Err(KvError::InvalidDirection { bits }),
    };

    // Exactly one operation bit must be set; zero or several are rejected
    let operation = match flags & OPERATION_MASK {
        STATS => Operation::Stats,
        SET => Operation::Set,
        GET => Operation::Get,
        EXIT => Operation::Exit,
        bits => return Err(KvError::UnknownOperation { bits }),
    };

    let key = get_field(&mut buf, "key")?;
    let value = get_field(&mut buf, "value")?;

    Ok(match direction {
        Direction::Request => Message::request(operation, key, value),
        Direction::Response => Message::response(operation, value),
    })
}

/// Append one length-prefixed UTF-8 field
fn put_field(buf: &mut BytesMut, field: &'static str, text: &str) -> Result<()> {
    let bytes = text.as_bytes();
    if bytes.len() > MAX_FIELD_LEN {
        return Err(KvError::FieldTooLong {
            field,
            len: bytes.len(),
            max: MAX_FIELD_LEN,
        });
    }

    buf.put_u16(bytes.len() as u16);
    buf.put_slice(bytes);
    Ok(())
}

/// Read one length-prefixed UTF-8 field
fn get_field(buf: &mut &[u8], field: &'static str) -> Result<String> {
    if buf.remaining() < 2 {
        return Err(KvError::MalformedFrame(format!(
            "{field} length prefix truncated"
        )));
    }

    let len = buf.get_u16() as usize;
    if buf.remaining() < len {
        return Err(KvError::MalformedFrame(format!(
            "{field} truncated: expected {len} bytes, got {}",
            buf.remaining()
        )));
    }

    let raw = &buf[..len];
    let text = std::str::from_utf8(raw)
        .map_err(|_| KvError::MalformedFrame(format!("{field} is not valid UTF-8")))?
        .to_string();
    buf.advance(len);

    Ok(text)
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request frame: mode marker, 1-byte length, payload
pub fn write_request<W: Write>(writer: &mut W, message: &Message) -> Result<()> {
    let payload = encode_message(message)?;
    if payload.len() > MAX_REQUEST_PAYLOAD {
        return Err(KvError::FrameTooLarge {
            len: payload.len(),
            max: MAX_REQUEST_PAYLOAD,
        });
    }

    writer.write_all(&[BINARY_MODE, payload.len() as u8])?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

/// Read a request frame body (length + payload) and decode it
///
/// The caller has already consumed the `0xFF` mode marker.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Message> {
    let mut len_buf = [0u8; 1];
    reader.read_exact(&mut len_buf)?;
    let len = len_buf[0] as usize;

    let mut payload = vec![0u8; len];
    if len > 0 {
        reader.read_exact(&mut payload)?;
    }

    decode_message(&payload)
}

/// Write a response frame: 4-byte big-endian signed length, payload
pub fn write_response<W: Write>(writer: &mut W, message: &Message) -> Result<()> {
    let payload = encode_message(message)?;

    writer.write_all(&(payload.len() as i32).to_be_bytes())?;
    writer.write_all(&payload)?;
    writer.flush()?;
    Ok(())
}

/// Read a response frame and decode it
pub fn read_response<R: Read>(reader: &mut R) -> Result<Message> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = i32::from_be_bytes(len_buf);

    if len < 0 || len as usize > MAX_RESPONSE_PAYLOAD {
        return Err(KvError::MalformedFrame(format!(
            "response length out of range: {len}"
        )));
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;

    decode_message(&payload)
}
