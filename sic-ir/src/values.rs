//! IR Value Representations
//!
//! Defines operands used as inputs and outputs of IR operations, together
//! with the producer link back to the operation that assigns them.

use sic_common::OperationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an operand refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperandKind {
    /// Hardware register read as a primary input
    Register(u32),

    /// Immediate constant
    Constant(i32),

    /// Word `offset` of constant buffer `slot`
    ConstantBuffer { slot: u32, offset: u32 },

    /// SSA value assigned by exactly one operation
    LocalVariable,

    /// Undefined value
    Undefined,
}

/// IR Operand
///
/// Producer and use links are maintained by [`crate::Function`]; they are
/// lookups into the function's operation table, never ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operand {
    pub kind: OperandKind,
    #[serde(skip)]
    pub(crate) producer: Option<OperationId>,
    #[serde(skip)]
    pub(crate) uses: Vec<OperationId>,
}

impl Operand {
    pub fn new(kind: OperandKind) -> Self {
        Self {
            kind,
            producer: None,
            uses: Vec::new(),
        }
    }

    /// The operation that assigns this operand, if any
    pub fn producer(&self) -> Option<OperationId> {
        self.producer
    }

    /// Operations reading this operand, one entry per source slot
    pub fn uses(&self) -> &[OperationId] {
        &self.uses
    }

    pub fn is_unused(&self) -> bool {
        self.uses.is_empty()
    }

    /// Returns `(slot, offset)` for constant buffer reads
    pub fn as_constant_buffer(&self) -> Option<(u32, u32)> {
        match self.kind {
            OperandKind::ConstantBuffer { slot, offset } => Some((slot, offset)),
            _ => None,
        }
    }

    pub fn is_constant_buffer(&self) -> bool {
        matches!(self.kind, OperandKind::ConstantBuffer { .. })
    }
}

impl fmt::Display for OperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandKind::Register(index) => write!(f, "r{index}"),
            OperandKind::Constant(value) => write!(f, "#{value}"),
            OperandKind::ConstantBuffer { slot, offset } => write!(f, "cb{slot}[{offset:#x}]"),
            OperandKind::LocalVariable => write!(f, "local"),
            OperandKind::Undefined => write!(f, "undef"),
        }
    }
}
