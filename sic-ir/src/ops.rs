//! IR Operations
//!
//! Defines the memory regions and atomic read-modify-write operations
//! available to memory-class instructions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory region targeted by a load, store or atomic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryRegion {
    /// Unbounded memory addressed by a full 64-bit address
    Global,
    /// Workgroup shared memory
    Shared,
    /// One of the bound storage buffers, selected by a storage index
    Storage,
}

/// Atomic read-modify-write operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomicOp {
    Add,
    And,
    CompareAndSwap,
    MinS32,
    MinU32,
    MaxS32,
    MaxU32,
    Or,
    Swap,
    Xor,
}

impl AtomicOp {
    /// Number of value sources following the address
    pub fn value_count(&self) -> usize {
        match self {
            AtomicOp::CompareAndSwap => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let region_str = match self {
            MemoryRegion::Global => "global",
            MemoryRegion::Shared => "shared",
            MemoryRegion::Storage => "storage",
        };
        write!(f, "{region_str}")
    }
}

impl fmt::Display for AtomicOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op_str = match self {
            AtomicOp::Add => "add",
            AtomicOp::And => "and",
            AtomicOp::CompareAndSwap => "cas",
            AtomicOp::MinS32 => "min.s32",
            AtomicOp::MinU32 => "min.u32",
            AtomicOp::MaxS32 => "max.s32",
            AtomicOp::MaxU32 => "max.u32",
            AtomicOp::Or => "or",
            AtomicOp::Swap => "swap",
            AtomicOp::Xor => "xor",
        };
        write!(f, "{op_str}")
    }
}
