//! Response definitions
//!
//! Status codes and the raw response frame.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Response status codes
///
/// `Ok` is the only success value. Codes below `0x10` come from the store,
/// the rest are produced by the client itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[must_use]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
    KeyExists = 0x03,
    TypeMismatch = 0x04,
    InvalidParam = 0x05,
    Empty = 0x06,

    // Client side
    ProtocolError = 0x10,
    Timeout = 0x11,
    ConnectionLost = 0x12,
    ClosedSession = 0x13,
}

impl Status {
    pub fn from_u8(byte: u8) -> Option<Self> {
        let status = match byte {
            0x00 => Status::Ok,
            0x01 => Status::NotFound,
            0x02 => Status::Error,
            0x03 => Status::KeyExists,
            0x04 => Status::TypeMismatch,
            0x05 => Status::InvalidParam,
            0x06 => Status::Empty,
            0x10 => Status::ProtocolError,
            0x11 => Status::Timeout,
            0x12 => Status::ConnectionLost,
            0x13 => Status::ClosedSession,
            _ => return None,
        };
        Some(status)
    }

    pub fn is_ok(self) -> bool {
        self == Status::Ok
    }

    /// Numeric code as used on the wire
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Ok => "OK",
            Status::NotFound => "NOT_FOUND",
            Status::Error => "ERROR",
            Status::KeyExists => "KEY_EXISTS",
            Status::TypeMismatch => "TYPE_MISMATCH",
            Status::InvalidParam => "INVALID_PARAM",
            Status::Empty => "EMPTY",
            Status::ProtocolError => "PROTOCOL_ERROR",
            Status::Timeout => "TIMEOUT",
            Status::ConnectionLost => "CONNECTION_LOST",
            Status::ClosedSession => "CLOSED_SESSION",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// A response frame
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (result data for OK, message for failures)
    pub payload: Option<Bytes>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload: payload.map(Bytes::from),
        }
    }

    /// Create a failure response without payload
    pub fn status(status: Status) -> Self {
        Self {
            status,
            payload: None,
        }
    }

    /// Create an ERROR response carrying a message
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(Bytes::copy_from_slice(message.as_bytes())),
        }
    }

    /// Payload bytes, empty when absent
    pub fn payload_bytes(&self) -> Bytes {
        self.payload.clone().unwrap_or_default()
    }
}
