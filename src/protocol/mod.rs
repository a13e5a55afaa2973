//! Protocol Module
//!
//! Defines the wire protocol spoken on both session channels.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01-0x06: read channel  (PING, DUMP, STAT, STAT_SYS, RANGE, COUNT)
//! - 0x10-0x1C: write channel (CREATE, CLEAN, RMKEY, DEL, DEL_BY_MASK, INSERT,
//!   MOVE, MASK, TAG, LPUSH, RPUSH, LPOP, RPOP)
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01-0x06: store failures (NOT_FOUND, ERROR, KEY_EXISTS, ...)
//! - 0x10-0x13: client failures (PROTOCOL_ERROR, TIMEOUT, ...)

mod command;
mod response;
mod types;
mod codec;

pub use command::{ChannelRole, Command, CommandType};
pub use response::{Response, Status};
pub use types::{ListKind, RangeKind, ValueType, POS_AUTO, TAG_DEL, TAG_RESTORE};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
