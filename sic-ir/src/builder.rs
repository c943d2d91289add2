//! IR Builder
//!
//! Provides utilities for constructing shader IR programmatically.

use sic_common::{BlockId, IrError, OperandId, OperationId, Result};
use crate::{AtomicOp, Function, Instruction, MemoryRegion, OperandKind, Operation};

/// Builder for constructing IR
pub struct IrBuilder {
    function: Function,
    current_block: Option<BlockId>,
}

impl IrBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            function: Function::new(name.into()),
            current_block: None,
        }
    }

    /// Create a block and make it the insertion point
    pub fn create_block(&mut self) -> BlockId {
        let id = self.function.add_block();
        self.current_block = Some(id);
        id
    }

    pub fn switch_to_block(&mut self, id: BlockId) -> Result<()> {
        if self.function.block(id).is_none() {
            return Err(IrError::UnknownBlock(id));
        }
        self.current_block = Some(id);
        Ok(())
    }

    pub fn register(&mut self, index: u32) -> OperandId {
        self.function.add_operand(OperandKind::Register(index))
    }

    pub fn constant(&mut self, value: i32) -> OperandId {
        self.function.add_operand(OperandKind::Constant(value))
    }

    /// Read of word `offset` in constant buffer `slot`
    pub fn constant_buffer(&mut self, slot: u32, offset: u32) -> OperandId {
        self.function.add_operand(OperandKind::ConstantBuffer { slot, offset })
    }

    pub fn local(&mut self) -> OperandId {
        self.function.add_operand(OperandKind::LocalVariable)
    }

    /// Emit a value-producing operation into a fresh local
    pub fn build(&mut self, instruction: Instruction, sources: Vec<OperandId>) -> Result<OperandId> {
        let dest = self.local();
        self.emit(Operation::new(instruction, Some(dest), sources))?;
        Ok(dest)
    }

    pub fn build_copy(&mut self, source: OperandId) -> Result<OperandId> {
        self.build(Instruction::Copy, vec![source])
    }

    pub fn build_add(&mut self, lhs: OperandId, rhs: OperandId) -> Result<OperandId> {
        self.build(Instruction::Add, vec![lhs, rhs])
    }

    pub fn build_load(&mut self, region: MemoryRegion, address: OperandId) -> Result<OperandId> {
        self.build(Instruction::Load(region), vec![address])
    }

    pub fn build_store(&mut self, region: MemoryRegion, address: OperandId, value: OperandId) -> Result<OperationId> {
        self.emit(Operation::new(Instruction::Store(region), None, vec![address, value]))
    }

    /// Emit an atomic; `values` follow the address in source order
    pub fn build_atomic(
        &mut self,
        op: AtomicOp,
        region: MemoryRegion,
        address: OperandId,
        values: &[OperandId],
    ) -> Result<OperandId> {
        let mut sources = vec![address];
        sources.extend_from_slice(values);
        self.build(Instruction::Atomic(op, region), sources)
    }

    pub fn build_storage_load(&mut self, storage_index: u32, address: OperandId) -> Result<OperandId> {
        let dest = self.local();
        self.emit(Operation::with_storage_index(
            Instruction::Load(MemoryRegion::Storage),
            storage_index,
            Some(dest),
            vec![address],
        ))?;
        Ok(dest)
    }

    pub fn build_return(&mut self) -> Result<OperationId> {
        self.emit(Operation::new(Instruction::Return, None, Vec::new()))
    }

    /// Add `operation` to the function and append it to the current block
    pub fn emit(&mut self, operation: Operation) -> Result<OperationId> {
        let block_id = self.current_block.ok_or(IrError::NoCurrentBlock)?;
        let id = self.function.add_operation(operation)?;
        self.function
            .block_mut(block_id)
            .ok_or(IrError::UnknownBlock(block_id))?
            .push(id);
        Ok(id)
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn current_block_has_terminator(&self) -> bool {
        self.current_block
            .is_some_and(|id| self.function.block_has_terminator(id))
    }

    pub fn finish(self) -> Function {
        self.function
    }
}
