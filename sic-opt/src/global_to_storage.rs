//! Global memory to storage buffer rewriting
//!
//! Global loads, stores and atomics whose address is derived from a storage
//! descriptor in constant buffer 0 are turned into accesses to the bound
//! storage buffer that descriptor names. Accesses that cannot be traced back
//! to a descriptor stay global.

use log::{debug, trace};
use sic_common::{BlockId, OperationId, ShaderStage};
use sic_ir::{Cursor, Function, Instruction, MemoryRegion, Operation};
use std::ops::Range;

use crate::def_chain::{search_for_storage_base, StorageMatch};
use crate::storage_layout::storage_region;

/// Rewrite the qualifying global accesses of `block` in place
pub fn run_pass(function: &mut Function, block: BlockId, stage: ShaderStage) {
    let region = storage_region(stage);

    let Some(block_index) = function.blocks.iter().position(|b| b.id == block) else {
        debug!("global_to_storage: no block{block} in '{}'", function.name);
        return;
    };

    let mut next = function.blocks[block_index].first();
    while let Some(mut cursor) = next {
        let Some(id) = function.blocks[block_index].get(cursor) else {
            break;
        };

        if is_candidate(function[id].instruction) {
            match find_storage_base(function, id, &region) {
                Some(found) => {
                    if let Some(replaced) =
                        replace_global_with_storage(function, block_index, cursor, found.storage_index)
                    {
                        if let Some(storage_op) = function.blocks[block_index].get(replaced) {
                            debug!(
                                "global_to_storage: {id} -> {} (cb0[{:#x}], stage {stage})",
                                function.display_operation(storage_op),
                                found.cb_offset,
                            );
                        }
                        cursor = replaced;
                    }
                }
                None => trace!("global_to_storage: {} left global", function.display_operation(id)),
            }
        }

        next = function.blocks[block_index].next(cursor);
    }
}

/// Trace the address (source 0) of `id` back to a storage descriptor
///
/// Addresses without a producer, such as raw registers, never match.
fn find_storage_base(function: &Function, id: OperationId, region: &Range<u32>) -> Option<StorageMatch> {
    let address = function[id].source(0)?;
    let producer = function.producer_of(address)?;
    search_for_storage_base(function, producer, region)
}

/// Global loads, global stores and global atomics
fn is_candidate(instruction: Instruction) -> bool {
    matches!(
        instruction,
        Instruction::Load(MemoryRegion::Global)
            | Instruction::Store(MemoryRegion::Global)
            | Instruction::Atomic(_, MemoryRegion::Global)
    )
}

/// Swap the operation at `cursor` for its storage buffer form
///
/// The original operation loses all of its sources before it is unlinked.
/// Returns the cursor of the replacement.
fn replace_global_with_storage(
    function: &mut Function,
    block_index: usize,
    cursor: Cursor,
    storage_index: u32,
) -> Option<Cursor> {
    let id = function.blocks[block_index].get(cursor)?;
    let replacement = storage_operation(&function[id], storage_index)?;

    function.clear_sources(id);
    let storage_op = function.replace_operation(id, replacement);

    function.blocks[block_index].replace(cursor, storage_op)
}

fn storage_operation(operation: &Operation, storage_index: u32) -> Option<Operation> {
    let instruction = operation.instruction.with_region(MemoryRegion::Storage)?;

    let storage_op = match operation.instruction {
        Instruction::Atomic(..) => Operation::with_storage_index(
            instruction,
            storage_index,
            operation.dest(),
            operation.sources().to_vec(),
        ),
        Instruction::Load(_) => Operation::with_storage_index(
            instruction,
            storage_index,
            operation.dest(),
            vec![operation.source(0)?],
        ),
        _ => Operation::with_storage_index(
            instruction,
            storage_index,
            None,
            vec![operation.source(0)?, operation.source(1)?],
        ),
    };
    Some(storage_op)
}

/// Number of storage-class operations placed in `block`
pub(crate) fn count_storage_operations(function: &Function, block: BlockId) -> usize {
    function
        .block(block)
        .map(|b| {
            b.iter()
                .filter(|&id| function[id].instruction.is_storage())
                .count()
        })
        .unwrap_or(0)
}
