//! Error types for the memlink client
//!
//! Session establishment failures are returned as errors from `connect`.
//! Everything that goes wrong once a session exists is folded into a
//! [`Status`] via [`MemlinkError::status`].

use thiserror::Error;

use crate::protocol::Status;

/// Result type alias using MemlinkError
pub type Result<T> = std::result::Result<T, MemlinkError>;

/// Unified error type for memlink client operations
#[derive(Debug, Error)]
pub enum MemlinkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {host}:{port}: {reason}")]
    Connect {
        host: String,
        port: u16,
        reason: String,
    },

    #[error("Connection lost: {0}")]
    ConnectionLost(String),

    #[error("Operation timed out")]
    Timeout,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: u32 },

    // -------------------------------------------------------------------------
    // Session Errors
    // -------------------------------------------------------------------------
    #[error("Session is closed")]
    ClosedSession,

    #[error("Command failed with status {0}")]
    Status(Status),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MemlinkError {
    /// Map an error to the status code reported to callers
    pub fn status(&self) -> Status {
        match self {
            MemlinkError::Io(e) => match e.kind() {
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Status::Timeout,
                _ => Status::ConnectionLost,
            },
            MemlinkError::Connect { .. } | MemlinkError::ConnectionLost(_) => {
                Status::ConnectionLost
            }
            MemlinkError::Timeout => Status::Timeout,
            MemlinkError::Protocol(_) | MemlinkError::Serialization(_) => Status::ProtocolError,
            MemlinkError::ClosedSession => Status::ClosedSession,
            MemlinkError::Status(status) => *status,
            MemlinkError::Config(_) | MemlinkError::PayloadTooLarge { .. } => {
                Status::InvalidParam
            }
        }
    }

    /// Whether the channel that produced this error can no longer be trusted
    ///
    /// After a timeout, a dropped connection or a framing mismatch the
    /// request/response pairing on the channel is unknown.
    pub fn desynchronizes_channel(&self) -> bool {
        matches!(
            self.status(),
            Status::Timeout | Status::ConnectionLost | Status::ProtocolError
        )
    }
}

impl From<bincode::Error> for MemlinkError {
    fn from(e: bincode::Error) -> Self {
        MemlinkError::Serialization(e.to_string())
    }
}
