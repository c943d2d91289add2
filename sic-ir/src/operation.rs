//! IR Operation
//!
//! One instruction with its destination and ordered sources. Operations
//! are stored in a [`crate::Function`] and referenced by `OperationId`.

use sic_common::OperandId;
use serde::{Deserialize, Serialize};
use crate::Instruction;

/// IR Operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub instruction: Instruction,
    /// Bound storage buffer accessed by a storage-class instruction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_index: Option<u32>,
    pub(crate) dest: Option<OperandId>,
    pub(crate) sources: Vec<OperandId>,
}

impl Operation {
    pub fn new(instruction: Instruction, dest: Option<OperandId>, sources: Vec<OperandId>) -> Self {
        Self {
            instruction,
            storage_index: None,
            dest,
            sources,
        }
    }

    /// Operation on bound storage buffer `storage_index`
    pub fn with_storage_index(
        instruction: Instruction,
        storage_index: u32,
        dest: Option<OperandId>,
        sources: Vec<OperandId>,
    ) -> Self {
        Self {
            instruction,
            storage_index: Some(storage_index),
            dest,
            sources,
        }
    }

    pub fn dest(&self) -> Option<OperandId> {
        self.dest
    }

    pub fn sources(&self) -> &[OperandId] {
        &self.sources
    }

    pub fn source(&self, index: usize) -> Option<OperandId> {
        self.sources.get(index).copied()
    }

    pub fn sources_count(&self) -> usize {
        self.sources.len()
    }
}
