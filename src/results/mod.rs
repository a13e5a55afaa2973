//! Results Module
//!
//! Turns response payloads into caller-owned values.
//!
//! ## Payload Shapes
//! - Item lists: range, lpop, rpop
//! - Stat: six scalars per key
//! - StatSys: eight scalars for the whole store
//! - Count: visible and tag-deleted totals

mod decoder;
mod items;
mod reply;
mod stats;

pub use decoder::{
    decode_count, decode_items, decode_stat, decode_stat_sys, encode_count, encode_items,
    encode_stat, encode_stat_sys, ITEMS_HEADER_SIZE,
};
pub use items::{Item, ResultSet};
pub use reply::Reply;
pub use stats::{Count, Stat, StatSys};
