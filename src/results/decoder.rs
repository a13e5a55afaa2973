//! Payload decoding
//!
//! ## Item list payload (range, lpop, rpop)
//! ```text
//! ┌───────────┬──────────────┬─────────────┬──────────────────────────────┐
//! │ Count (4) │ ValueSize(4) │ MaskSize(4) │ Count x (value | mask)       │
//! └───────────┴──────────────┴─────────────┴──────────────────────────────┘
//! ```
//! The payload must end exactly after `count` records.
//!
//! ## Scalar payloads (stat, stat_sys, count)
//! Struct fields in declaration order, fixed width, big-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;
use serde::Serialize;

use bincode::Options;

use super::items::{Item, ResultSet};
use super::stats::{Count, Stat, StatSys};
use crate::error::{MemlinkError, Result};

/// Item list header: count + value size + mask size
pub const ITEMS_HEADER_SIZE: usize = 12;

fn wire_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

// =============================================================================
// Item Lists
// =============================================================================

/// Decode an item list
///
/// Items reference `payload` without copying.
pub fn decode_items(payload: Bytes) -> Result<ResultSet> {
    if payload.len() < ITEMS_HEADER_SIZE {
        return Err(MemlinkError::Protocol(format!(
            "Item list header truncated: expected {} bytes, got {}",
            ITEMS_HEADER_SIZE,
            payload.len()
        )));
    }

    let mut header = payload.slice(..ITEMS_HEADER_SIZE);
    let count = header.get_u32();
    let value_size = header.get_u32();
    let mask_size = header.get_u32();

    if count > 0 && value_size == 0 {
        return Err(MemlinkError::Protocol(format!(
            "Item list declares {} items of zero width",
            count
        )));
    }

    let record_size = value_size as u64 + mask_size as u64;
    let expected = ITEMS_HEADER_SIZE as u64 + count as u64 * record_size;
    let actual = payload.len() as u64;

    if actual < expected {
        return Err(MemlinkError::Protocol(format!(
            "Item list truncated: {} items need {} bytes, got {}",
            count, expected, actual
        )));
    }
    if actual > expected {
        return Err(MemlinkError::Protocol(format!(
            "Item list overrun: {} trailing bytes after {} items",
            actual - expected,
            count
        )));
    }

    let value_size_usize = value_size as usize;
    let record_size = record_size as usize;

    let items = (0..count as usize)
        .map(|i| {
            let start = ITEMS_HEADER_SIZE + i * record_size;
            let mask_start = start + value_size_usize;
            Item::new(
                payload.slice(start..mask_start),
                payload.slice(mask_start..start + record_size),
            )
        })
        .collect();

    Ok(ResultSet::new(value_size, mask_size, items))
}

/// Encode an item list
///
/// Values and masks are NUL-padded or truncated to their fixed widths.
pub fn encode_items<'a, I>(value_size: u32, mask_size: u32, items: I) -> Vec<u8>
where
    I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
{
    let mut body = BytesMut::new();
    let mut count: u32 = 0;

    for (value, mask) in items {
        put_fixed(&mut body, value, value_size as usize);
        put_fixed(&mut body, mask, mask_size as usize);
        count += 1;
    }

    let mut out = BytesMut::with_capacity(ITEMS_HEADER_SIZE + body.len());
    out.put_u32(count);
    out.put_u32(value_size);
    out.put_u32(mask_size);
    out.put_slice(&body);
    out.to_vec()
}

fn put_fixed(buf: &mut BytesMut, field: &[u8], width: usize) {
    let n = field.len().min(width);
    buf.put_slice(&field[..n]);
    buf.put_bytes(0, width - n);
}

// =============================================================================
// Scalar Snapshots
// =============================================================================

fn decode_scalars<T: DeserializeOwned>(payload: &[u8], what: &str) -> Result<T> {
    wire_options()
        .deserialize(payload)
        .map_err(|e| MemlinkError::Protocol(format!("{} payload: {}", what, e)))
}

fn encode_scalars<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(wire_options().serialize(value)?)
}

pub fn decode_stat(payload: &[u8]) -> Result<Stat> {
    decode_scalars(payload, "Stat")
}

pub fn decode_stat_sys(payload: &[u8]) -> Result<StatSys> {
    decode_scalars(payload, "StatSys")
}

pub fn decode_count(payload: &[u8]) -> Result<Count> {
    decode_scalars(payload, "Count")
}

pub fn encode_stat(stat: &Stat) -> Result<Vec<u8>> {
    encode_scalars(stat)
}

pub fn encode_stat_sys(stat: &StatSys) -> Result<Vec<u8>> {
    encode_scalars(stat)
}

pub fn encode_count(count: &Count) -> Result<Vec<u8>> {
    encode_scalars(count)
}
