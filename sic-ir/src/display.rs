//! Textual IR dumps

use sic_common::{BlockId, OperandId, OperationId};
use std::fmt::{self, Write};
use crate::{Function, OperandKind};

impl Function {
    /// Render an operand: locals by handle, everything else by kind
    pub fn display_operand(&self, id: OperandId) -> String {
        match self.operand(id).map(|operand| operand.kind) {
            Some(OperandKind::LocalVariable) | None => id.to_string(),
            Some(kind) => kind.to_string(),
        }
    }

    /// Render one operation, e.g. `%4 = load.storage[2] %3`
    pub fn display_operation(&self, id: OperationId) -> String {
        let Some(operation) = self.operation(id) else {
            return format!("<invalid {id}>");
        };

        let mut line = String::new();
        if let Some(dest) = operation.dest() {
            let _ = write!(line, "{} = ", self.display_operand(dest));
        }
        let _ = write!(line, "{}", operation.instruction);
        if let Some(index) = operation.storage_index {
            let _ = write!(line, "[{index}]");
        }
        for (i, &source) in operation.sources().iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            let _ = write!(line, "{sep}{}", self.display_operand(source));
        }
        line
    }

    pub fn display_block(&self, id: BlockId) -> String {
        let mut text = format!("block{id}:\n");
        if let Some(block) = self.block(id) {
            for operation in block.iter() {
                let _ = writeln!(text, "    {}", self.display_operation(operation));
            }
        }
        text
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "function {} {{", self.name)?;
        for block in &self.blocks {
            write!(f, "{}", self.display_block(block.id))?;
        }
        write!(f, "}}")
    }
}
