//! Shader IR Compiler - Optimization Passes
//!
//! This crate holds the IR rewriting passes that run between translation
//! and code generation. Currently it provides global-to-storage rewriting,
//! which turns global memory accesses addressed through storage descriptors
//! into indexed storage buffer accesses.

pub mod def_chain;
pub mod global_to_storage;
pub mod storage_layout;

pub use def_chain::{search_for_storage_base, StorageMatch};
pub use global_to_storage::run_pass;
pub use storage_layout::{storage_base_cb_offset, storage_cb_offset, storage_region};

use log::debug;
use sic_common::ShaderStage;
use sic_ir::Function;

/// Options for the optimization pipeline
#[derive(Debug, Clone)]
pub struct PassOptions {
    pub global_to_storage: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            global_to_storage: true,
        }
    }
}

/// Summary of one pipeline run over a function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub blocks: usize,
    pub rewritten: usize,
}

/// Run the enabled passes over every block of `function`
pub fn optimize_function(function: &mut Function, stage: ShaderStage, options: &PassOptions) -> PassReport {
    let mut report = PassReport::default();
    let block_ids: Vec<_> = function.blocks.iter().map(|b| b.id).collect();

    for block in block_ids {
        report.blocks += 1;
        if options.global_to_storage {
            let before = global_to_storage::count_storage_operations(function, block);
            run_pass(function, block, stage);
            let after = global_to_storage::count_storage_operations(function, block);
            report.rewritten += after.saturating_sub(before);
        }
    }

    debug!(
        "optimized '{}' for {stage}: {} blocks, {} accesses rewritten",
        function.name, report.blocks, report.rewritten
    );
    report
}
