//! Shader IR Compiler - Intermediate Representation
//! 
//! This crate defines the shader IR consumed and rewritten by the
//! optimization passes in `sic-opt`.
//! 
//! ## Architecture
//! 
//! The crate is structured as follows:
//! - `values` - Operands and their producer/use links
//! - `ops` - Memory regions and atomic operations
//! - `instructions` - IR opcodes
//! - `operation` - A single IR instruction with its operands
//! - `blocks` - Basic blocks with cursor-stable operation lists
//! - `function` - Operand/operation tables and graph mutation
//! - `builder` - IR construction utilities
//! - `validate` - Structural checks for loaded IR
//! - `display` - Textual IR dumps

// Public exports - clean API surface
pub use self::values::{Operand, OperandKind};
pub use self::ops::{AtomicOp, MemoryRegion};
pub use self::instructions::{Instruction, SourceArity};
pub use self::operation::Operation;
pub use self::blocks::{BasicBlock, Cursor};
pub use self::function::Function;
pub use self::builder::IrBuilder;
pub use sic_common::{BlockId, IrError, OperandId, OperationId, Result, ShaderStage};

// Internal modules
mod values;
mod ops;
mod instructions;
mod operation;
mod blocks;
mod function;
mod builder;
mod validate;
mod display;

#[cfg(test)]
mod tests;
