//! Backward search over producer links
//!
//! Decides whether an address is computed from a storage descriptor read,
//! i.e. from a constant buffer 0 word inside the current stage's
//! descriptor block.

use log::trace;
use sic_common::OperationId;
use sic_ir::Function;
use std::collections::{HashSet, VecDeque};
use std::ops::Range;

use crate::storage_layout::STORAGE_DESC_SIZE;

/// A descriptor read found in an address computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageMatch {
    /// Bound storage buffer the descriptor describes
    pub storage_index: u32,
    /// Constant buffer 0 word that was read
    pub cb_offset: u32,
}

/// Breadth-first walk from `root` through the producers of its sources
///
/// The first descriptor read reached wins. Operations reachable along
/// several paths are inspected once.
pub fn search_for_storage_base(
    function: &Function,
    root: OperationId,
    region: &Range<u32>,
) -> Option<StorageMatch> {
    let mut assignments = VecDeque::from([root]);
    let mut visited = HashSet::from([root]);

    while let Some(id) = assignments.pop_front() {
        let Some(operation) = function.operation(id) else {
            continue;
        };
        trace!("  inspecting {}", function.display_operation(id));

        for &source in operation.sources() {
            let Some(operand) = function.operand(source) else {
                continue;
            };

            if let Some((slot, offset)) = operand.as_constant_buffer() {
                if slot == 0 && region.contains(&offset) {
                    return Some(StorageMatch {
                        storage_index: (offset - region.start) / STORAGE_DESC_SIZE,
                        cb_offset: offset,
                    });
                }
            }

            if let Some(producer) = operand.producer() {
                if visited.insert(producer) {
                    assignments.push_back(producer);
                }
            }
        }
    }

    None
}
