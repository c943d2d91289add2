//! Function Definitions
//!
//! A function owns the operand and operation tables of one shader and the
//! basic blocks ordering its operations. Every graph mutation goes through
//! here so producer and use links stay in sync with operation contents.

use sic_common::{BlockId, IrError, OperandId, OperationId, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;
use crate::{BasicBlock, Instruction, Operand, OperandKind, Operation};

/// Function in IR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    operands: Vec<Operand>,
    operations: Vec<Operation>,
    pub blocks: Vec<BasicBlock>,
}

impl Function {
    pub fn new(name: String) -> Self {
        Self {
            name,
            operands: Vec::new(),
            operations: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn add_operand(&mut self, kind: OperandKind) -> OperandId {
        self.operands.push(Operand::new(kind));
        OperandId((self.operands.len() - 1) as u32)
    }

    /// Add an operation to the operation table
    ///
    /// The operation becomes the producer of its destination and a use of
    /// each of its sources. It is not placed in any block.
    pub fn add_operation(&mut self, operation: Operation) -> Result<OperationId> {
        let id = OperationId(self.operations.len() as u32);
        self.check_operation(id, &operation)?;

        if let Some(dest) = operation.dest {
            if let Some(existing) = self.operands[dest.index()].producer {
                return Err(IrError::MultipleProducers { operand: dest, existing });
            }
        }

        self.operations.push(operation);
        self.attach(id);
        Ok(id)
    }

    /// Append a new empty block, returning its id
    pub fn add_block(&mut self) -> BlockId {
        let id = self.blocks.len() as BlockId;
        self.blocks.push(BasicBlock::new(id));
        id
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut BasicBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    pub fn entry_block(&self) -> Option<&BasicBlock> {
        self.blocks.first()
    }

    pub fn operand(&self, id: OperandId) -> Option<&Operand> {
        self.operands.get(id.index())
    }

    pub fn operation(&self, id: OperationId) -> Option<&Operation> {
        self.operations.get(id.index())
    }

    pub fn operands(&self) -> impl Iterator<Item = (OperandId, &Operand)> {
        self.operands
            .iter()
            .enumerate()
            .map(|(i, operand)| (OperandId(i as u32), operand))
    }

    pub fn operations(&self) -> impl Iterator<Item = (OperationId, &Operation)> {
        self.operations
            .iter()
            .enumerate()
            .map(|(i, operation)| (OperationId(i as u32), operation))
    }

    /// The operation assigning `operand`, if it is a computed value
    pub fn producer_of(&self, operand: OperandId) -> Option<OperationId> {
        self.operand(operand).and_then(Operand::producer)
    }

    /// Replace source `index` of `operation` with `operand`
    pub fn set_source(&mut self, operation: OperationId, index: usize, operand: OperandId) -> Result<()> {
        if self.operand(operand).is_none() {
            return Err(IrError::UnknownOperand(operand));
        }
        let op = self
            .operations
            .get_mut(operation.index())
            .ok_or(IrError::UnknownOperation(operation))?;
        let (instruction, count) = (op.instruction, op.sources.len());
        let slot = op
            .sources
            .get_mut(index)
            .ok_or_else(|| IrError::source_count(instruction, format!("more than {index}"), count))?;
        let previous = std::mem::replace(slot, operand);

        self.remove_use(previous, operation);
        self.operands[operand.index()].uses.push(operation);
        Ok(())
    }

    /// Drop every source of `operation`
    ///
    /// Operands read only by `operation` are left without uses.
    pub fn clear_sources(&mut self, operation: OperationId) {
        let Some(op) = self.operations.get_mut(operation.index()) else {
            return;
        };
        let sources = std::mem::take(&mut op.sources);
        for source in sources {
            self.remove_use(source, operation);
        }
    }

    /// Install `replacement` as the new producer of the destination of `old`
    ///
    /// `old` keeps no destination afterwards. Its sources are untouched; use
    /// [`Function::clear_sources`] to release them. The caller is responsible
    /// for swapping the two in the owning block.
    pub fn replace_operation(&mut self, old: OperationId, replacement: Operation) -> OperationId {
        if let Some(dest) = self.operations.get_mut(old.index()).and_then(|op| op.dest.take()) {
            self.operands[dest.index()].producer = None;
        }

        let id = OperationId(self.operations.len() as u32);
        self.operations.push(replacement);
        self.attach(id);
        id
    }

    pub fn block_has_terminator(&self, id: BlockId) -> bool {
        self.block(id)
            .and_then(|block| block.last().and_then(|cursor| block.get(cursor)))
            .and_then(|op| self.operation(op))
            .is_some_and(|op| op.instruction == Instruction::Return)
    }

    /// Load a function from its JSON form
    ///
    /// Producer and use links are recomputed from the operations, then the
    /// whole function is validated.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut function: Function = serde_json::from_str(text).map_err(|e| IrError::Serialization {
            message: e.to_string(),
        })?;
        function.relink()?;
        function.validate()?;
        Ok(function)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| IrError::Serialization {
            message: e.to_string(),
        })
    }

    /// Rebuild producer and use links from operation contents
    pub(crate) fn relink(&mut self) -> Result<()> {
        for operand in &mut self.operands {
            operand.producer = None;
            operand.uses.clear();
        }
        for index in 0..self.operations.len() {
            let id = OperationId(index as u32);
            self.check_handles(&self.operations[index])?;
            if let Some(dest) = self.operations[index].dest {
                if let Some(existing) = self.operands[dest.index()].producer {
                    return Err(IrError::MultipleProducers { operand: dest, existing });
                }
            }
            self.attach(id);
        }
        Ok(())
    }

    fn attach(&mut self, id: OperationId) {
        let operation = &self.operations[id.index()];
        if let Some(dest) = operation.dest {
            self.operands[dest.index()].producer = Some(id);
        }
        for &source in &operation.sources {
            self.operands[source.index()].uses.push(id);
        }
    }

    fn remove_use(&mut self, operand: OperandId, operation: OperationId) {
        if let Some(operand) = self.operands.get_mut(operand.index()) {
            if let Some(pos) = operand.uses.iter().position(|&user| user == operation) {
                operand.uses.remove(pos);
            }
        }
    }
}

impl Index<OperandId> for Function {
    type Output = Operand;

    fn index(&self, id: OperandId) -> &Operand {
        &self.operands[id.index()]
    }
}

impl Index<OperationId> for Function {
    type Output = Operation;

    fn index(&self, id: OperationId) -> &Operation {
        &self.operations[id.index()]
    }
}
