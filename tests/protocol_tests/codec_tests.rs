//! Codec Tests
//!
//! Tests for command and response encoding/decoding.

use std::io::Cursor;

use memlink::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, ChannelRole, Command, CommandType, ListKind,
    RangeKind, Response, Status, ValueType, MAX_PAYLOAD_SIZE, POS_AUTO, TAG_DEL,
};
use memlink::MemlinkError;

// =============================================================================
// Command Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_insert() {
    let cmd = Command::Insert {
        key: "users".to_string(),
        value: b"u001".to_vec(),
        mask: "4:3:1".to_string(),
        pos: 7,
    };
    let decoded = decode_command(&encode_command(&cmd).unwrap()).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_range() {
    let cmd = Command::Range {
        key: "users".to_string(),
        kind: RangeKind::TagDeleted,
        mask: "::1".to_string(),
        from: -1,
        len: 50,
    };
    let decoded = decode_command(&encode_command(&cmd).unwrap()).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_create() {
    let cmd = Command::Create {
        key: "scores".to_string(),
        value_size: 4,
        mask: "8:1".to_string(),
        list_kind: ListKind::SortList,
        value_type: ValueType::UInt,
    };
    let decoded = decode_command(&encode_command(&cmd).unwrap()).unwrap();
    assert_eq!(decoded, cmd);
}

#[test]
fn test_encode_decode_payloadless_commands() {
    for cmd in [Command::Ping, Command::Dump, Command::StatSys] {
        let encoded = encode_command(&cmd).unwrap();
        assert_eq!(encoded.len(), 5);
        assert_eq!(decode_command(&encoded).unwrap(), cmd);
    }
}

#[test]
fn test_encode_decode_auto_position() {
    let cmd = Command::Insert {
        key: "s".to_string(),
        value: b"42".to_vec(),
        mask: String::new(),
        pos: POS_AUTO,
    };
    match decode_command(&encode_command(&cmd).unwrap()).unwrap() {
        Command::Insert { pos, .. } => assert_eq!(pos, -1),
        other => panic!("Expected INSERT command, got {:?}", other),
    }
}

#[test]
fn test_encode_decode_empty_value() {
    let cmd = Command::Delete {
        key: "key".to_string(),
        value: vec![],
    };
    match decode_command(&encode_command(&cmd).unwrap()).unwrap() {
        Command::Delete { key, value } => {
            assert_eq!(key, "key");
            assert!(value.is_empty());
        }
        _ => panic!("Expected DEL command"),
    }
}

#[test]
fn test_encode_decode_binary_value() {
    // Embedded NULs and high bytes must survive because length travels with the value
    let binary_value: Vec<u8> = vec![0x00, 0x01, 0x00, 0xFF, 0xFE, 0x80, 0x00];

    let cmd = Command::Tag {
        key: "bin".to_string(),
        value: binary_value.clone(),
        tag: TAG_DEL,
    };
    match decode_command(&encode_command(&cmd).unwrap()).unwrap() {
        Command::Tag { value, tag, .. } => {
            assert_eq!(value, binary_value);
            assert_eq!(tag, TAG_DEL);
        }
        _ => panic!("Expected TAG command"),
    }
}

// =============================================================================
// Channel Routing Tests
// =============================================================================

#[test]
fn test_query_commands_use_read_channel() {
    let reads = [
        Command::Ping,
        Command::Dump,
        Command::StatSys,
        Command::Stat { key: "k".into() },
        Command::Count {
            key: "k".into(),
            mask: String::new(),
        },
        Command::Range {
            key: "k".into(),
            kind: RangeKind::All,
            mask: String::new(),
            from: 0,
            len: 1,
        },
    ];
    for cmd in &reads {
        assert_eq!(cmd.role(), ChannelRole::Read, "{:?}", cmd);
    }
}

#[test]
fn test_mutations_use_write_channel() {
    let writes = [
        Command::Clean { key: "k".into() },
        Command::RmKey { key: "k".into() },
        Command::LPop {
            key: "k".into(),
            num: 1,
        },
        Command::RPush {
            key: "k".into(),
            value: b"v".to_vec(),
            mask: String::new(),
        },
        Command::Move {
            key: "k".into(),
            value: b"v".to_vec(),
            pos: 0,
        },
    ];
    for cmd in &writes {
        assert_eq!(cmd.role(), ChannelRole::Write, "{:?}", cmd);
    }
}

#[test]
fn test_command_type_byte_round_trip() {
    for byte in 0u8..=0xFF {
        if let Some(cmd_type) = CommandType::from_u8(byte) {
            assert_eq!(cmd_type as u8, byte);
        }
    }
    assert_eq!(CommandType::from_u8(0x00), None);
}

// =============================================================================
// Response Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_response_ok() {
    let resp = Response::ok(Some(b"value".to_vec()));
    let decoded = decode_response(&encode_response(&resp)).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.payload.as_deref(), Some(&b"value"[..]));
}

#[test]
fn test_encode_decode_response_ok_no_payload() {
    let resp = Response::ok(None);
    let decoded = decode_response(&encode_response(&resp)).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.payload, None);
}

#[test]
fn test_encode_decode_response_failures() {
    for status in [
        Status::NotFound,
        Status::KeyExists,
        Status::TypeMismatch,
        Status::Empty,
    ] {
        let decoded = decode_response(&encode_response(&Response::status(status))).unwrap();
        assert_eq!(decoded.status, status);
        assert_eq!(decoded.payload, None);
    }
}

#[test]
fn test_encode_decode_response_error() {
    let resp = Response::error("something went wrong");
    let decoded = decode_response(&encode_response(&resp)).unwrap();

    assert_eq!(decoded.status, Status::Error);
    assert_eq!(decoded.payload.as_deref(), Some(&b"something went wrong"[..]));
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_incomplete_header() {
    let bytes = [0x01, 0x00, 0x00]; // Only 3 bytes, need 5
    let result = decode_command(&bytes);
    assert!(result.unwrap_err().to_string().contains("Incomplete command header"));
}

#[test]
fn test_incomplete_payload() {
    // Header says 10 bytes payload, but only 5 provided
    let bytes = [0x03, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, 0x00, 0x05, 0x68];
    let result = decode_command(&bytes);
    assert!(result.unwrap_err().to_string().contains("Incomplete"));
}

#[test]
fn test_unknown_command_type() {
    let bytes = [0xFF, 0x00, 0x00, 0x00, 0x00];
    let result = decode_command(&bytes);
    assert!(result.unwrap_err().to_string().contains("Unknown command type"));
}

#[test]
fn test_unknown_response_status() {
    let bytes = [0xFF, 0x00, 0x00, 0x00, 0x00];
    let result = decode_response(&bytes);
    assert!(result.unwrap_err().to_string().contains("Unknown response status"));
}

#[test]
fn test_stat_missing_key_length() {
    // STAT with payload too short for the key length
    let bytes = [0x03, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00];
    assert!(decode_command(&bytes).is_err());
}

#[test]
fn test_key_length_beyond_payload() {
    // STAT claims a 9-byte key but carries 2
    let bytes = [
        0x03, 0x00, 0x00, 0x00, 0x06, 0x00, 0x00, 0x00, 0x09, b'a', b'b',
    ];
    let err = decode_command(&bytes).unwrap_err();
    assert!(err.to_string().contains("incomplete field"));
}

#[test]
fn test_ping_with_unexpected_payload() {
    let bytes = [0x01, 0x00, 0x00, 0x00, 0x05, 0x68, 0x65, 0x6C, 0x6C, 0x6F];
    let result = decode_command(&bytes);
    assert!(result.unwrap_err().to_string().contains("unexpected payload"));
}

#[test]
fn test_unknown_range_kind() {
    let mut encoded = encode_command(&Command::Range {
        key: "k".to_string(),
        kind: RangeKind::Visible,
        mask: String::new(),
        from: 0,
        len: 1,
    })
    .unwrap();
    // kind byte sits right after the 5-byte header and the 4+1 byte key
    encoded[10] = 0x7F;
    let err = decode_command(&encoded).unwrap_err();
    assert!(err.to_string().contains("unknown range kind"));
}

#[test]
fn test_encode_rejects_oversized_payload() {
    let cmd = Command::Insert {
        key: "k".to_string(),
        value: vec![b'x'; MAX_PAYLOAD_SIZE as usize + 1],
        mask: String::new(),
        pos: POS_AUTO,
    };

    let err = encode_command(&cmd).unwrap_err();
    assert!(matches!(err, MemlinkError::PayloadTooLarge { .. }));
    assert_eq!(err.status(), Status::InvalidParam);
    assert!(!err.desynchronizes_channel());

    // Nothing reaches the stream either
    let mut sink = Vec::new();
    assert!(write_command(&mut sink, &cmd).is_err());
    assert!(sink.is_empty());
}

#[test]
fn test_encode_accepts_payload_at_the_cap() {
    // key (4 + 1) + value (4 + n) + mask (4) + pos (4)
    let n = MAX_PAYLOAD_SIZE as usize - 17;
    let cmd = Command::Insert {
        key: "k".to_string(),
        value: vec![b'x'; n],
        mask: String::new(),
        pos: POS_AUTO,
    };

    let encoded = encode_command(&cmd).unwrap();
    assert_eq!(&encoded[1..5], &MAX_PAYLOAD_SIZE.to_be_bytes());
    assert_eq!(decode_command(&encoded).unwrap(), cmd);
}

#[test]
fn test_payload_too_large() {
    let mut bytes = vec![0x00];
    bytes.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_be_bytes());
    let err = decode_response(&bytes).unwrap_err();
    assert!(err.to_string().contains("Payload too large"));
}

// =============================================================================
// Stream I/O Tests
// =============================================================================

#[test]
fn test_stream_write_read_command() {
    let cmd = Command::LPush {
        key: "q".to_string(),
        value: b"job-1".to_vec(),
        mask: "1:1".to_string(),
    };

    let mut buffer = Vec::new();
    write_command(&mut buffer, &cmd).unwrap();

    let mut cursor = Cursor::new(buffer);
    assert_eq!(read_command(&mut cursor).unwrap(), cmd);
}

#[test]
fn test_stream_write_read_response() {
    let resp = Response::ok(Some(b"result".to_vec()));

    let mut buffer = Vec::new();
    write_response(&mut buffer, &resp).unwrap();

    let mut cursor = Cursor::new(buffer);
    let decoded = read_response(&mut cursor).unwrap();

    assert_eq!(decoded.status, Status::Ok);
    assert_eq!(decoded.payload.as_deref(), Some(&b"result"[..]));
}

#[test]
fn test_stream_multiple_commands() {
    let commands = vec![
        Command::Ping,
        Command::Insert {
            key: "k1".to_string(),
            value: b"v1".to_vec(),
            mask: String::new(),
            pos: 0,
        },
        Command::Count {
            key: "k1".to_string(),
            mask: String::new(),
        },
        Command::RPop {
            key: "k1".to_string(),
            num: 3,
        },
    ];

    let mut buffer = Vec::new();
    for cmd in &commands {
        write_command(&mut buffer, cmd).unwrap();
    }

    // Each read stops exactly at its own frame boundary
    let mut cursor = Cursor::new(buffer);
    for expected in &commands {
        assert_eq!(&read_command(&mut cursor).unwrap(), expected);
    }
}

#[test]
fn test_stream_truncated_response() {
    let mut bytes = encode_response(&Response::ok(Some(b"abcdef".to_vec())));
    bytes.truncate(bytes.len() - 2);

    let mut cursor = Cursor::new(bytes);
    let err = read_response(&mut cursor).unwrap_err();
    assert_eq!(err.status(), Status::ConnectionLost);
}

// =============================================================================
// Wire Format Verification Tests
// =============================================================================

#[test]
fn test_wire_format_stat() {
    let encoded = encode_command(&Command::Stat {
        key: "test".to_string(),
    })
    .unwrap();

    // Expected: [0x03][0x00 0x00 0x00 0x08][0x00 0x00 0x00 0x04][t e s t]
    //           cmd   payload_len(8)       key_len(4)          key
    assert_eq!(encoded[0], 0x03);
    assert_eq!(&encoded[1..5], &[0x00, 0x00, 0x00, 0x08]);
    assert_eq!(&encoded[5..9], &[0x00, 0x00, 0x00, 0x04]);
    assert_eq!(&encoded[9..13], b"test");
}

#[test]
fn test_wire_format_value_carries_length() {
    let encoded = encode_command(&Command::Delete {
        key: "k".to_string(),
        value: vec![0x00, 0x00, 0x41],
    })
    .unwrap();

    // [0x13][len=12][key_len=1][k][value_len=3][00 00 41]
    assert_eq!(encoded[0], 0x13);
    assert_eq!(&encoded[1..5], &[0x00, 0x00, 0x00, 0x0C]);
    assert_eq!(&encoded[10..14], &[0x00, 0x00, 0x00, 0x03]);
    assert_eq!(&encoded[14..17], &[0x00, 0x00, 0x41]);
}

#[test]
fn test_wire_format_response_ok() {
    let encoded = encode_response(&Response::ok(Some(b"hi".to_vec())));

    // Expected: [0x00][0x00 0x00 0x00 0x02][h i]
    assert_eq!(encoded[0], 0x00);
    assert_eq!(&encoded[1..5], &[0x00, 0x00, 0x00, 0x02]);
    assert_eq!(&encoded[5..7], b"hi");
}
