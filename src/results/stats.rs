//! Scalar snapshots
//!
//! Field order here is the order on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-key statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub value_size: u32,
    pub mask_size: u32,
    /// Allocated blocks
    pub blocks: u32,
    /// Value slots across all blocks
    pub data: u32,
    /// Slots holding a value
    pub data_used: u32,
    /// Memory held by the key, in bytes
    pub mem: u64,
}

/// Whole-store statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSys {
    pub keys: u32,
    pub values: u32,
    pub blocks: u32,
    pub data: u32,
    pub data_used: u32,
    /// Value slots per block
    pub block_values: u32,
    /// Memory held by the key hash table, in bytes
    pub ht_mem: u64,
    /// Free blocks kept in the memory pool
    pub pool_blocks: u32,
}

/// Result of a count query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    /// Matching values not tagged as deleted
    pub visible: u32,
    /// Matching values tagged as deleted
    pub tagged: u32,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "valuesize:{}", self.value_size)?;
        writeln!(f, "masksize:{}", self.mask_size)?;
        writeln!(f, "blocks:{}", self.blocks)?;
        writeln!(f, "data:{}", self.data)?;
        writeln!(f, "data_used:{}", self.data_used)?;
        writeln!(f, "mem:{}", self.mem)
    }
}

impl fmt::Display for StatSys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "keys:{}", self.keys)?;
        writeln!(f, "values:{}", self.values)?;
        writeln!(f, "blocks:{}", self.blocks)?;
        writeln!(f, "data:{}", self.data)?;
        writeln!(f, "data_used:{}", self.data_used)?;
        writeln!(f, "block_values:{}", self.block_values)?;
        writeln!(f, "ht_mem:{}", self.ht_mem)?;
        writeln!(f, "pool_blocks:{}", self.pool_blocks)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "visible:{}", self.visible)?;
        writeln!(f, "tagged:{}", self.tagged)
    }
}
