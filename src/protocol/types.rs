//! Argument types shared by commands
//!
//! Key kinds, value types and range kinds travel as single bytes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tag value marking an item as deleted (kept, but hidden from visible ranges)
pub const TAG_DEL: u8 = 1;

/// Tag value restoring a previously tag-deleted item
pub const TAG_RESTORE: u8 = 0;

/// Position meaning "let the store's ordering decide" (sortlist insertion)
pub const POS_AUTO: i32 = -1;

/// Collection kind backing a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ListKind {
    /// Positional list, values stay where they are inserted
    List = 0x01,
    /// Queue, values enter and leave at the ends
    Queue = 0x02,
    /// Values kept sorted by the key's value type
    SortList = 0x03,
}

impl ListKind {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ListKind::List),
            0x02 => Some(ListKind::Queue),
            0x03 => Some(ListKind::SortList),
            _ => None,
        }
    }
}

/// How the store compares values of a sortlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ValueType {
    Int = 0x01,
    UInt = 0x02,
    Long = 0x03,
    ULong = 0x04,
    Float = 0x05,
    Double = 0x06,
    String = 0x07,
    Binary = 0x08,
}

impl ValueType {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(ValueType::Int),
            0x02 => Some(ValueType::UInt),
            0x03 => Some(ValueType::Long),
            0x04 => Some(ValueType::ULong),
            0x05 => Some(ValueType::Float),
            0x06 => Some(ValueType::Double),
            0x07 => Some(ValueType::String),
            0x08 => Some(ValueType::Binary),
            _ => None,
        }
    }
}

/// Which values a range query returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RangeKind {
    /// Values not tagged as deleted
    Visible = 0x01,
    /// Only values tagged as deleted
    TagDeleted = 0x02,
    /// Everything
    All = 0x03,
}

impl RangeKind {
    pub fn from_u8(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(RangeKind::Visible),
            0x02 => Some(RangeKind::TagDeleted),
            0x03 => Some(RangeKind::All),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListKind::List => "list",
            ListKind::Queue => "queue",
            ListKind::SortList => "sortlist",
        };
        f.write_str(name)
    }
}
