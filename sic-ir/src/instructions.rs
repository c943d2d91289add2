//! IR Instructions
//!
//! Defines the opcodes available in the shader IR. Memory-class opcodes
//! carry the region they target as a separate field, so switching the
//! region of an atomic keeps its operation kind intact.

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::{AtomicOp, MemoryRegion};

/// IR opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    // Arithmetic, as seen in address computations
    Copy,
    Add,
    Subtract,
    Multiply,
    ShiftLeft,
    ShiftRightU32,
    BitwiseAnd,
    BitwiseOr,
    PackDouble2x32,

    /// Dynamic constant buffer read: dest = cb[src0][src1]
    LoadConstant,

    /// dest = load address
    Load(MemoryRegion),

    /// store address, value
    Store(MemoryRegion),

    /// dest = atomic address, values...
    Atomic(AtomicOp, MemoryRegion),

    /// Thread-local memory, never shared with other invocations
    LoadLocal,
    StoreLocal,

    Return,
}

/// How many sources an instruction takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceArity {
    Exactly(usize),
    AtLeast(usize),
}

impl SourceArity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            SourceArity::Exactly(n) => count == n,
            SourceArity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for SourceArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceArity::Exactly(n) => write!(f, "{n}"),
            SourceArity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl Instruction {
    pub fn is_atomic(&self) -> bool {
        matches!(self, Instruction::Atomic(..))
    }

    /// Region targeted by a load, store or atomic
    pub fn memory_region(&self) -> Option<MemoryRegion> {
        match *self {
            Instruction::Load(region)
            | Instruction::Store(region)
            | Instruction::Atomic(_, region) => Some(region),
            _ => None,
        }
    }

    /// Storage-class opcodes are the only ones carrying a storage index
    pub fn is_storage(&self) -> bool {
        self.memory_region() == Some(MemoryRegion::Storage)
    }

    /// The same memory operation targeting `region`
    ///
    /// Returns `None` for opcodes that do not access a memory region.
    pub fn with_region(&self, region: MemoryRegion) -> Option<Instruction> {
        match *self {
            Instruction::Load(_) => Some(Instruction::Load(region)),
            Instruction::Store(_) => Some(Instruction::Store(region)),
            Instruction::Atomic(op, _) => Some(Instruction::Atomic(op, region)),
            _ => None,
        }
    }

    pub fn has_destination(&self) -> bool {
        !matches!(
            self,
            Instruction::Store(_) | Instruction::StoreLocal | Instruction::Return
        )
    }

    pub fn arity(&self) -> SourceArity {
        match self {
            Instruction::Copy | Instruction::Load(_) | Instruction::LoadLocal => {
                SourceArity::Exactly(1)
            }
            Instruction::Add
            | Instruction::Subtract
            | Instruction::Multiply
            | Instruction::ShiftLeft
            | Instruction::ShiftRightU32
            | Instruction::BitwiseAnd
            | Instruction::BitwiseOr
            | Instruction::PackDouble2x32
            | Instruction::LoadConstant
            | Instruction::Store(_)
            | Instruction::StoreLocal => SourceArity::Exactly(2),
            Instruction::Atomic(op, _) => SourceArity::Exactly(1 + op.value_count()),
            Instruction::Return => SourceArity::AtLeast(0),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Copy => write!(f, "copy"),
            Instruction::Add => write!(f, "add"),
            Instruction::Subtract => write!(f, "sub"),
            Instruction::Multiply => write!(f, "mul"),
            Instruction::ShiftLeft => write!(f, "shl"),
            Instruction::ShiftRightU32 => write!(f, "shr.u32"),
            Instruction::BitwiseAnd => write!(f, "and"),
            Instruction::BitwiseOr => write!(f, "or"),
            Instruction::PackDouble2x32 => write!(f, "pack.f64"),
            Instruction::LoadConstant => write!(f, "load.constant"),
            Instruction::Load(region) => write!(f, "load.{region}"),
            Instruction::Store(region) => write!(f, "store.{region}"),
            Instruction::Atomic(op, region) => write!(f, "atomic.{op}.{region}"),
            Instruction::LoadLocal => write!(f, "load.local"),
            Instruction::StoreLocal => write!(f, "store.local"),
            Instruction::Return => write!(f, "ret"),
        }
    }
}
