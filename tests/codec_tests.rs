//! Codec Tests
//!
//! Tests for message payload encoding/decoding and stream framing.

use std::io::Cursor;

use lrukv::protocol::{
    decode_message, encode_message, read_request, read_response, write_request, write_response,
    Direction, Message, Operation, BINARY_MODE, MAX_REQUEST_PAYLOAD,
};
use lrukv::KvError;

/// Hand-build a payload: flags + length-prefixed key + length-prefixed value
fn raw_payload(flags: u16, key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&flags.to_be_bytes());
    bytes.extend_from_slice(&(key.len() as u16).to_be_bytes());
    bytes.extend_from_slice(key);
    bytes.extend_from_slice(&(value.len() as u16).to_be_bytes());
    bytes.extend_from_slice(value);
    bytes
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_roundtrip_request_all_operations() {
    for op in [Operation::Get, Operation::Set, Operation::Stats, Operation::Exit] {
        let msg = Message::request(op, "mykey", "myvalue");
        let encoded = encode_message(&msg).unwrap();
        let decoded = decode_message(&encoded).unwrap();

        assert_eq!(decoded.direction, Direction::Request);
        assert_eq!(decoded.operation, op);
        assert_eq!(decoded.key, "mykey");
        assert_eq!(decoded.value, "myvalue");
    }
}

#[test]
fn test_roundtrip_response_drops_key() {
    // The response key slot is a placeholder; even if an encoder fills it,
    // decoding a response must reproduce only the value.
    let mut msg = Message::response(Operation::Get, "found it");
    msg.key = "stray key".to_string();

    let encoded = encode_message(&msg).unwrap();
    let decoded = decode_message(&encoded).unwrap();

    assert_eq!(decoded.direction, Direction::Response);
    assert_eq!(decoded.operation, Operation::Get);
    assert_eq!(decoded.value, "found it");
    assert!(decoded.key.is_empty());
}

#[test]
fn test_roundtrip_empty_key_and_value() {
    let msg = Message::request(Operation::Stats, "", "");
    let decoded = decode_message(&encode_message(&msg).unwrap()).unwrap();

    assert_eq!(decoded.operation, Operation::Stats);
    assert!(decoded.key.is_empty());
    assert!(decoded.value.is_empty());
}

#[test]
fn test_roundtrip_multibyte_utf8() {
    let msg = Message::request(Operation::Set, "clé", "värde 値");
    let decoded = decode_message(&encode_message(&msg).unwrap()).unwrap();

    assert_eq!(decoded.key, "clé");
    assert_eq!(decoded.value, "värde 値");
}

// =============================================================================
// Flags Field Rejection
// =============================================================================

#[test]
fn test_bad_magic_rejected_despite_valid_sections() {
    // Well-formed key/value sections do not rescue a wrong magic pattern
    let payload = raw_payload(0x1502, b"key", b"value");

    match decode_message(&payload) {
        Err(KvError::BadMagic { flags }) => assert_eq!(flags, 0x1502),
        other => panic!("expected BadMagic, got {other:?}"),
    }
}

#[test]
fn test_no_direction_bit_rejected() {
    // Magic + GET but neither request nor response
    let payload = raw_payload(0x5402, b"key", b"value");

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::InvalidDirection { bits: 0 })
    ));
}

#[test]
fn test_both_direction_bits_rejected() {
    let payload = raw_payload(0x5702, b"key", b"value");

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::InvalidDirection { bits: 0x0300 })
    ));
}

#[test]
fn test_no_operation_bit_rejected() {
    let payload = raw_payload(0x5500, b"key", b"value");

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::UnknownOperation { bits: 0 })
    ));
}

#[test]
fn test_multiple_operation_bits_rejected() {
    // GET|EXIT together: the reference decoder would quietly pick EXIT;
    // here ambiguity is an error
    let payload = raw_payload(0x5503, b"key", b"value");

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::UnknownOperation { bits: 0x0003 })
    ));
}

// =============================================================================
// Malformed Payloads
// =============================================================================

#[test]
fn test_payload_shorter_than_flags_field() {
    assert!(matches!(
        decode_message(&[]),
        Err(KvError::MalformedFrame(_))
    ));
    assert!(matches!(
        decode_message(&[0x54]),
        Err(KvError::MalformedFrame(_))
    ));
}

#[test]
fn test_missing_string_sections() {
    // Valid flags (request/get) but nothing after them
    let payload = 0x5502u16.to_be_bytes().to_vec();

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::MalformedFrame(_))
    ));
}

#[test]
fn test_truncated_key_body() {
    let mut payload = 0x5502u16.to_be_bytes().to_vec();
    payload.extend_from_slice(&5u16.to_be_bytes());
    payload.extend_from_slice(b"abc"); // declared 5, only 3 present

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::MalformedFrame(_))
    ));
}

#[test]
fn test_invalid_utf8_rejected() {
    let payload = raw_payload(0x5502, &[0xff, 0xfe], b"value");

    assert!(matches!(
        decode_message(&payload),
        Err(KvError::MalformedFrame(_))
    ));
}

#[test]
fn test_trailing_bytes_ignored() {
    let mut payload = encode_message(&Message::request(Operation::Get, "k", "v")).unwrap();
    payload.extend_from_slice(b"junk after the value section");

    let decoded = decode_message(&payload).unwrap();
    assert_eq!(decoded.key, "k");
    assert_eq!(decoded.value, "v");
}

// =============================================================================
// Encode-side Limits
// =============================================================================

#[test]
fn test_field_longer_than_length_prefix_rejected() {
    let msg = Message::response(Operation::Get, "v".repeat(70_000));

    assert!(matches!(
        encode_message(&msg),
        Err(KvError::FieldTooLong { field: "value", .. })
    ));
}

#[test]
fn test_request_frame_over_one_byte_length_rejected() {
    // Fits the 2-byte field prefix but not the 1-byte request frame length
    let msg = Message::request(Operation::Set, "k".repeat(300), "v");
    let mut sink = Vec::new();

    assert!(matches!(
        write_request(&mut sink, &msg),
        Err(KvError::FrameTooLarge { .. })
    ));
}

// =============================================================================
// Stream Framing
// =============================================================================

#[test]
fn test_request_frame_roundtrip() {
    let msg = Message::request(Operation::Set, "alpha", "beta");

    let mut wire = Vec::new();
    write_request(&mut wire, &msg).unwrap();

    // Mode marker, then the 1-byte length the dispatcher reads
    assert_eq!(wire[0], BINARY_MODE);
    assert_eq!(wire[1] as usize, wire.len() - 2);
    assert!(wire.len() - 2 <= MAX_REQUEST_PAYLOAD);

    let mut reader = Cursor::new(&wire[1..]);
    let decoded = read_request(&mut reader).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_response_frame_roundtrip() {
    let msg = Message::response(Operation::Stats, "3 of 1000 entries used, 0 evicted");

    let mut wire = Vec::new();
    write_response(&mut wire, &msg).unwrap();

    // 4-byte big-endian signed length prefix
    let len = i32::from_be_bytes(wire[..4].try_into().unwrap());
    assert_eq!(len as usize, wire.len() - 4);

    let mut reader = Cursor::new(wire);
    let decoded = read_response(&mut reader).unwrap();
    assert_eq!(decoded, msg);
}

#[test]
fn test_response_negative_length_rejected() {
    let mut wire = (-1i32).to_be_bytes().to_vec();
    wire.extend_from_slice(b"whatever");

    let mut reader = Cursor::new(wire);
    assert!(matches!(
        read_response(&mut reader),
        Err(KvError::MalformedFrame(_))
    ));
}

#[test]
fn test_request_frame_truncated_payload() {
    // Length byte promises 10 bytes, stream ends after 4
    let wire = [10u8, 0x55, 0x02, 0x00, 0x01];

    let mut reader = Cursor::new(&wire[..]);
    assert!(matches!(read_request(&mut reader), Err(KvError::Io(_))));
}
