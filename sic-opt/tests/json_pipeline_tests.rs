//! Loading serialized IR, optimizing it and writing it back

use pretty_assertions::assert_eq;
use sic_common::{OperandId, ShaderStage};
use sic_ir::{AtomicOp, Function, Instruction, MemoryRegion};
use sic_opt::{optimize_function, PassOptions};

const FRAGMENT_ATOMIC: &str = include_str!("data/fragment_atomic.json");

#[test]
fn test_optimize_loaded_function() {
    let mut function = Function::from_json(FRAGMENT_ATOMIC).unwrap();

    let report = optimize_function(&mut function, ShaderStage::Fragment, &PassOptions::default());
    assert_eq!(report.rewritten, 1);
    assert_eq!(report.blocks, 1);

    let atomic = function.producer_of(OperandId(6)).unwrap();
    assert_eq!(
        function[atomic].instruction,
        Instruction::Atomic(AtomicOp::Add, MemoryRegion::Storage)
    );
    assert_eq!(function[atomic].storage_index, Some(3));

    let load = function.producer_of(OperandId(8)).unwrap();
    assert_eq!(function[load].instruction, Instruction::Load(MemoryRegion::Global));

    assert_eq!(
        function.display_block(0),
        "block0:\n    %2 = pack.f64 cb0[0x150], cb0[0x151]\n    %4 = add %2, r2\n    \
         %6 = atomic.add.storage[3] %4, #1\n    %8 = load.global r4\n    ret\n"
    );
}

#[test]
fn test_optimized_function_reloads() {
    let mut function = Function::from_json(FRAGMENT_ATOMIC).unwrap();
    optimize_function(&mut function, ShaderStage::Fragment, &PassOptions::default());

    let reloaded = Function::from_json(&function.to_json().unwrap()).unwrap();
    assert_eq!(reloaded, function);
}

#[test]
fn test_wrong_stage_leaves_function_unchanged() {
    let mut function = Function::from_json(FRAGMENT_ATOMIC).unwrap();
    let before = function.clone();

    let report = optimize_function(&mut function, ShaderStage::Vertex, &PassOptions::default());

    assert_eq!(report.rewritten, 0);
    assert_eq!(function, before);
}
