//! Command definitions
//!
//! Every call on a session becomes one of these before it is framed.

use super::types::{ListKind, RangeKind, ValueType};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    Ping = 0x01,
    Dump = 0x02,
    Stat = 0x03,
    StatSys = 0x04,
    Range = 0x05,
    Count = 0x06,
    Create = 0x10,
    Clean = 0x11,
    RmKey = 0x12,
    Delete = 0x13,
    DeleteByMask = 0x14,
    Insert = 0x15,
    Move = 0x16,
    Mask = 0x17,
    Tag = 0x18,
    LPush = 0x19,
    RPush = 0x1A,
    LPop = 0x1B,
    RPop = 0x1C,
}

impl CommandType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        let cmd = match byte {
            0x01 => CommandType::Ping,
            0x02 => CommandType::Dump,
            0x03 => CommandType::Stat,
            0x04 => CommandType::StatSys,
            0x05 => CommandType::Range,
            0x06 => CommandType::Count,
            0x10 => CommandType::Create,
            0x11 => CommandType::Clean,
            0x12 => CommandType::RmKey,
            0x13 => CommandType::Delete,
            0x14 => CommandType::DeleteByMask,
            0x15 => CommandType::Insert,
            0x16 => CommandType::Move,
            0x17 => CommandType::Mask,
            0x18 => CommandType::Tag,
            0x19 => CommandType::LPush,
            0x1A => CommandType::RPush,
            0x1B => CommandType::LPop,
            0x1C => CommandType::RPop,
            _ => return None,
        };
        Some(cmd)
    }

    /// The channel this command must travel on
    pub fn role(self) -> ChannelRole {
        match self {
            CommandType::Ping
            | CommandType::Dump
            | CommandType::Stat
            | CommandType::StatSys
            | CommandType::Range
            | CommandType::Count => ChannelRole::Read,
            _ => ChannelRole::Write,
        }
    }
}

/// Which of the session's two channels carries a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    /// Queries: ping, dump, stat, stat_sys, range, count
    Read,
    /// Mutations: create, clean, rmkey, delete, insert, move, mask, tag, push, pop
    Write,
}

impl std::fmt::Display for ChannelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelRole::Read => f.write_str("read"),
            ChannelRole::Write => f.write_str("write"),
        }
    }
}

/// A command ready to be encoded
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Health check
    Ping,

    /// Ask the store to write a dump of its data
    Dump,

    /// Per-key statistics
    Stat { key: String },

    /// Whole-store statistics
    StatSys,

    /// List `len` values of `kind` matching `mask`, starting at `from`
    Range {
        key: String,
        kind: RangeKind,
        mask: String,
        from: i32,
        len: u32,
    },

    /// Count visible and tag-deleted values matching `mask`
    Count { key: String, mask: String },

    /// Create a key
    Create {
        key: String,
        value_size: u32,
        mask: String,
        list_kind: ListKind,
        value_type: ValueType,
    },

    /// Remove tag-deleted values and compact the key
    Clean { key: String },

    /// Remove a key and all its values
    RmKey { key: String },

    /// Delete one value
    Delete { key: String, value: Vec<u8> },

    /// Delete every value matching a mask
    DeleteByMask { key: String, mask: String },

    /// Insert a value at `pos` (`-1` lets the store decide)
    Insert {
        key: String,
        value: Vec<u8>,
        mask: String,
        pos: i32,
    },

    /// Move a value to a new position
    Move { key: String, value: Vec<u8>, pos: i32 },

    /// Replace a value's mask
    Mask {
        key: String,
        value: Vec<u8>,
        mask: String,
    },

    /// Set a value's tag
    Tag { key: String, value: Vec<u8>, tag: u8 },

    /// Push at the head
    LPush {
        key: String,
        value: Vec<u8>,
        mask: String,
    },

    /// Push at the tail
    RPush {
        key: String,
        value: Vec<u8>,
        mask: String,
    },

    /// Pop `num` values from the head
    LPop { key: String, num: u32 },

    /// Pop `num` values from the tail
    RPop { key: String, num: u32 },
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Ping => CommandType::Ping,
            Command::Dump => CommandType::Dump,
            Command::Stat { .. } => CommandType::Stat,
            Command::StatSys => CommandType::StatSys,
            Command::Range { .. } => CommandType::Range,
            Command::Count { .. } => CommandType::Count,
            Command::Create { .. } => CommandType::Create,
            Command::Clean { .. } => CommandType::Clean,
            Command::RmKey { .. } => CommandType::RmKey,
            Command::Delete { .. } => CommandType::Delete,
            Command::DeleteByMask { .. } => CommandType::DeleteByMask,
            Command::Insert { .. } => CommandType::Insert,
            Command::Move { .. } => CommandType::Move,
            Command::Mask { .. } => CommandType::Mask,
            Command::Tag { .. } => CommandType::Tag,
            Command::LPush { .. } => CommandType::LPush,
            Command::RPush { .. } => CommandType::RPush,
            Command::LPop { .. } => CommandType::LPop,
            Command::RPop { .. } => CommandType::RPop,
        }
    }

    /// The channel this command must travel on
    pub fn role(&self) -> ChannelRole {
        self.command_type().role()
    }
}
