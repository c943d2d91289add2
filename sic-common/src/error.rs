//! Error handling for the shader IR compiler
//!
//! Errors here describe malformed IR or failed I/O around it. Optimization
//! passes never fail: an access that cannot be rewritten is simply left alone.

use crate::types::{BlockId, OperandId, OperationId};
use thiserror::Error;

/// Main error type for IR construction, validation and loading
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    #[error("Unknown operand {0}")]
    UnknownOperand(OperandId),

    #[error("Unknown operation {0}")]
    UnknownOperation(OperationId),

    #[error("Unknown basic block {0}")]
    UnknownBlock(BlockId),

    #[error("Constant buffer operand {operand} cannot be assigned by an operation")]
    ConstantBufferProducer { operand: OperandId },

    #[error("Operand {operand} is already assigned by {existing}")]
    MultipleProducers {
        operand: OperandId,
        existing: OperationId,
    },

    #[error("Operand {operand} names {recorded} as producer, but that operation does not write it")]
    ProducerMismatch {
        operand: OperandId,
        recorded: OperationId,
    },

    #[error("Storage index mismatch on {operation}: {message}")]
    StorageIndexMismatch {
        operation: OperationId,
        message: String,
    },

    #[error("Storage index {index} is out of range (max {max})")]
    StorageIndexOutOfRange { index: u32, max: u32 },

    #[error("Instruction {instruction} expects {expected} sources, found {found}")]
    SourceCount {
        instruction: String,
        expected: String,
        found: usize,
    },

    #[error("Invalid instruction: {message}")]
    InvalidInstruction { message: String },

    #[error("No current block")]
    NoCurrentBlock,

    #[error("Unknown shader stage '{0}'")]
    UnknownStage(String),

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Result type used throughout the IR crates
pub type Result<T> = std::result::Result<T, IrError>;

impl IrError {
    /// Create a source count error
    pub fn source_count(instruction: impl ToString, expected: impl ToString, found: usize) -> Self {
        IrError::SourceCount {
            instruction: instruction.to_string(),
            expected: expected.to_string(),
            found,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for IrError {
    fn from(err: std::io::Error) -> Self {
        IrError::Io {
            message: err.to_string(),
        }
    }
}
