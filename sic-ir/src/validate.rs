//! Structural validation
//!
//! Checks the invariants the passes rely on: handles resolve, constant
//! buffer reads are never assigned, each computed value has one producer,
//! and memory operations carry the sources and storage index they declare.

use sic_common::{IrError, OperationId, Result, STORAGE_MAX_COUNT};
use std::collections::HashSet;
use crate::{Function, OperandKind, Operation};

impl Function {
    /// Validate the whole function
    ///
    /// Operations detached by a rewrite stay in the operation table; only
    /// operations placed in a block are checked for well-formedness.
    pub fn validate(&self) -> Result<()> {
        let mut placed = HashSet::new();
        for block in &self.blocks {
            for id in block.iter() {
                let operation = self.operation(id).ok_or(IrError::UnknownOperation(id))?;
                self.check_operation(id, operation)?;
                if !placed.insert(id) {
                    return Err(IrError::InvalidInstruction {
                        message: format!("{id} is placed more than once"),
                    });
                }
            }
        }

        for (id, operation) in self.operations() {
            if !placed.contains(&id) {
                self.check_handles(operation)?;
            }
            if let Some(dest) = operation.dest() {
                if self[dest].producer() != Some(id) {
                    return Err(IrError::InvalidInstruction {
                        message: format!("{id} writes {dest}, which does not name it as producer"),
                    });
                }
            }
        }

        for (id, operand) in self.operands() {
            let Some(producer) = operand.producer() else {
                continue;
            };
            if operand.is_constant_buffer() {
                return Err(IrError::ConstantBufferProducer { operand: id });
            }
            let writes = self.operation(producer).and_then(Operation::dest);
            if writes != Some(id) {
                return Err(IrError::ProducerMismatch { operand: id, recorded: producer });
            }
        }

        Ok(())
    }

    /// Check a single operation before it joins the function
    pub(crate) fn check_operation(&self, id: OperationId, operation: &Operation) -> Result<()> {
        self.check_handles(operation)?;

        let instruction = operation.instruction;
        let arity = instruction.arity();
        if !arity.accepts(operation.sources_count()) {
            return Err(IrError::source_count(instruction, arity, operation.sources_count()));
        }

        match (instruction.has_destination(), operation.dest()) {
            (true, None) => {
                return Err(IrError::InvalidInstruction {
                    message: format!("{instruction} requires a destination"),
                });
            }
            (false, Some(_)) => {
                return Err(IrError::InvalidInstruction {
                    message: format!("{instruction} does not write a destination"),
                });
            }
            _ => {}
        }

        if let Some(dest) = operation.dest() {
            match self[dest].kind {
                OperandKind::ConstantBuffer { .. } => {
                    return Err(IrError::ConstantBufferProducer { operand: dest });
                }
                OperandKind::Constant(_) | OperandKind::Undefined => {
                    return Err(IrError::InvalidInstruction {
                        message: format!("{instruction} cannot assign {}", self[dest].kind),
                    });
                }
                OperandKind::Register(_) | OperandKind::LocalVariable => {}
            }
        }

        match (instruction.is_storage(), operation.storage_index) {
            (true, Some(index)) if index >= STORAGE_MAX_COUNT => {
                Err(IrError::StorageIndexOutOfRange { index, max: STORAGE_MAX_COUNT })
            }
            (true, None) => Err(IrError::StorageIndexMismatch {
                operation: id,
                message: format!("{instruction} requires a storage index"),
            }),
            (false, Some(index)) => Err(IrError::StorageIndexMismatch {
                operation: id,
                message: format!("{instruction} cannot carry storage index {index}"),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_handles(&self, operation: &Operation) -> Result<()> {
        for &operand in operation.dest().iter().chain(operation.sources()) {
            if self.operand(operand).is_none() {
                return Err(IrError::UnknownOperand(operand));
            }
        }
        Ok(())
    }
}
