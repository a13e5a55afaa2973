//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload Fields
//! - key, mask, value: len (4 bytes) + bytes
//! - position, from:   i32 (4 bytes)
//! - num, len, size:   u32 (4 bytes)
//! - kind, type, tag:  u8
//!
//! Fields are written in the order they appear in [`Command`]. Opaque
//! values always carry their own length, they are never terminated.
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```

use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::types::{ListKind, RangeKind, ValueType};
use super::{Command, CommandType, Response, Status};
use crate::error::{MemlinkError, Result};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
///
/// Fails without producing a frame when the payload would exceed
/// [`MAX_PAYLOAD_SIZE`].
pub fn encode_command(command: &Command) -> Result<Vec<u8>> {
    let mut payload = BytesMut::new();

    match command {
        Command::Ping | Command::Dump | Command::StatSys => {}
        Command::Stat { key } | Command::Clean { key } | Command::RmKey { key } => {
            put_field(&mut payload, key.as_bytes());
        }
        Command::Range {
            key,
            kind,
            mask,
            from,
            len,
        } => {
            put_field(&mut payload, key.as_bytes());
            payload.put_u8(*kind as u8);
            put_field(&mut payload, mask.as_bytes());
            payload.put_i32(*from);
            payload.put_u32(*len);
        }
        Command::Count { key, mask } | Command::DeleteByMask { key, mask } => {
            put_field(&mut payload, key.as_bytes());
            put_field(&mut payload, mask.as_bytes());
        }
        Command::Create {
            key,
            value_size,
            mask,
            list_kind,
            value_type,
        } => {
            put_field(&mut payload, key.as_bytes());
            payload.put_u32(*value_size);
            put_field(&mut payload, mask.as_bytes());
            payload.put_u8(*list_kind as u8);
            payload.put_u8(*value_type as u8);
        }
        Command::Delete { key, value } => {
            put_field(&mut payload, key.as_bytes());
            put_field(&mut payload, value);
        }
        Command::Insert {
            key,
            value,
            mask,
            pos,
        } => {
            put_field(&mut payload, key.as_bytes());
            put_field(&mut payload, value);
            put_field(&mut payload, mask.as_bytes());
            payload.put_i32(*pos);
        }
        Command::Move { key, value, pos } => {
            put_field(&mut payload, key.as_bytes());
            put_field(&mut payload, value);
            payload.put_i32(*pos);
        }
        Command::Mask { key, value, mask }
        | Command::LPush { key, value, mask }
        | Command::RPush { key, value, mask } => {
            put_field(&mut payload, key.as_bytes());
            put_field(&mut payload, value);
            put_field(&mut payload, mask.as_bytes());
        }
        Command::Tag { key, value, tag } => {
            put_field(&mut payload, key.as_bytes());
            put_field(&mut payload, value);
            payload.put_u8(*tag);
        }
        Command::LPop { key, num } | Command::RPop { key, num } => {
            put_field(&mut payload, key.as_bytes());
            payload.put_u32(*num);
        }
    }

    // Build full message: header + payload
    let payload_len = checked_payload_len(payload.len())?;
    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(command.command_type() as u8);
    message.extend_from_slice(&payload_len.to_be_bytes());
    message.extend_from_slice(&payload);

    Ok(message)
}

/// Payload length as it goes on the wire, refusing anything over the cap
fn checked_payload_len(len: usize) -> Result<u32> {
    match u32::try_from(len) {
        Ok(len) if len <= MAX_PAYLOAD_SIZE => Ok(len),
        _ => Err(MemlinkError::PayloadTooLarge {
            size: len,
            max: MAX_PAYLOAD_SIZE,
        }),
    }
}

/// Write a length-prefixed field
///
/// Fields past `u32::MAX` bytes get a wrapped prefix here, but they also
/// push the payload past the cap, so the frame is never emitted.
fn put_field(buf: &mut BytesMut, field: &[u8]) {
    buf.put_u32(field.len() as u32);
    buf.put_slice(field);
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_byte, payload) = split_frame(bytes, "command")?;

    let cmd_type = CommandType::from_u8(cmd_byte).ok_or_else(|| {
        MemlinkError::Protocol(format!("Unknown command type: 0x{:02x}", cmd_byte))
    })?;

    let mut fields = FieldReader::new(payload, cmd_type);

    let command = match cmd_type {
        CommandType::Ping => Command::Ping,
        CommandType::Dump => Command::Dump,
        CommandType::StatSys => Command::StatSys,
        CommandType::Stat => Command::Stat {
            key: fields.string()?,
        },
        CommandType::Clean => Command::Clean {
            key: fields.string()?,
        },
        CommandType::RmKey => Command::RmKey {
            key: fields.string()?,
        },
        CommandType::Range => Command::Range {
            key: fields.string()?,
            kind: fields.enum_u8(RangeKind::from_u8, "range kind")?,
            mask: fields.string()?,
            from: fields.i32()?,
            len: fields.u32()?,
        },
        CommandType::Count => Command::Count {
            key: fields.string()?,
            mask: fields.string()?,
        },
        CommandType::DeleteByMask => Command::DeleteByMask {
            key: fields.string()?,
            mask: fields.string()?,
        },
        CommandType::Create => Command::Create {
            key: fields.string()?,
            value_size: fields.u32()?,
            mask: fields.string()?,
            list_kind: fields.enum_u8(ListKind::from_u8, "list kind")?,
            value_type: fields.enum_u8(ValueType::from_u8, "value type")?,
        },
        CommandType::Delete => Command::Delete {
            key: fields.string()?,
            value: fields.bytes()?,
        },
        CommandType::Insert => Command::Insert {
            key: fields.string()?,
            value: fields.bytes()?,
            mask: fields.string()?,
            pos: fields.i32()?,
        },
        CommandType::Move => Command::Move {
            key: fields.string()?,
            value: fields.bytes()?,
            pos: fields.i32()?,
        },
        CommandType::Mask => Command::Mask {
            key: fields.string()?,
            value: fields.bytes()?,
            mask: fields.string()?,
        },
        CommandType::Tag => Command::Tag {
            key: fields.string()?,
            value: fields.bytes()?,
            tag: fields.u8()?,
        },
        CommandType::LPush => Command::LPush {
            key: fields.string()?,
            value: fields.bytes()?,
            mask: fields.string()?,
        },
        CommandType::RPush => Command::RPush {
            key: fields.string()?,
            value: fields.bytes()?,
            mask: fields.string()?,
        },
        CommandType::LPop => Command::LPop {
            key: fields.string()?,
            num: fields.u32()?,
        },
        CommandType::RPop => Command::RPop {
            key: fields.string()?,
            num: fields.u32()?,
        },
    };

    fields.finish()?;
    Ok(command)
}

/// Validate a frame header and return (first byte, payload)
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(MemlinkError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
    check_payload_len(payload_len)?;

    let total_len = HEADER_SIZE + payload_len as usize;
    if bytes.len() < total_len {
        return Err(MemlinkError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((bytes[0], &bytes[HEADER_SIZE..total_len]))
}

fn check_payload_len(payload_len: u32) -> Result<()> {
    if payload_len > MAX_PAYLOAD_SIZE {
        return Err(MemlinkError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }
    Ok(())
}

/// Sequential reader over a command payload
struct FieldReader<'a> {
    buf: &'a [u8],
    cmd: CommandType,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8], cmd: CommandType) -> Self {
        Self { buf, cmd }
    }

    fn take(&mut self, n: usize, field: &str) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(MemlinkError::Protocol(format!(
                "{:?} command: incomplete {} (expected {}, got {})",
                self.cmd,
                field,
                n,
                self.buf.len()
            )));
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1, "byte")?[0])
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4, "u32")?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn i32(&mut self) -> Result<i32> {
        let b = self.take(4, "i32")?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.u32()? as usize;
        Ok(self.take(len, "field")?.to_vec())
    }

    fn string(&mut self) -> Result<String> {
        let raw = self.bytes()?;
        String::from_utf8(raw).map_err(|_| {
            MemlinkError::Protocol(format!("{:?} command: field is not UTF-8", self.cmd))
        })
    }

    fn enum_u8<T>(&mut self, parse: fn(u8) -> Option<T>, what: &str) -> Result<T> {
        let byte = self.u8()?;
        parse(byte).ok_or_else(|| {
            MemlinkError::Protocol(format!(
                "{:?} command: unknown {} 0x{:02x}",
                self.cmd, what, byte
            ))
        })
    }

    fn finish(self) -> Result<()> {
        if !self.buf.is_empty() {
            return Err(MemlinkError::Protocol(format!(
                "{:?} command: unexpected payload of {} trailing bytes",
                self.cmd,
                self.buf.len()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    let payload_len = payload.len() as u32;

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.push(response.status as u8);
    message.extend_from_slice(&payload_len.to_be_bytes());
    message.extend_from_slice(payload);

    message
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = Status::from_u8(status_byte).ok_or_else(|| {
        MemlinkError::Protocol(format!("Unknown response status: 0x{:02x}", status_byte))
    })?;

    let payload = if payload.is_empty() {
        None
    } else {
        Some(Bytes::copy_from_slice(payload))
    };

    Ok(Response { status, payload })
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]);
    check_payload_len(payload_len)?;

    let mut frame = vec![0u8; HEADER_SIZE + payload_len as usize];
    frame[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut frame[HEADER_SIZE..])?;
    }

    Ok(frame)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let frame = read_frame(reader)?;
    decode_command(&frame)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let frame = read_frame(reader)?;
    decode_response(&frame)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
