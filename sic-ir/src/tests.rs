//! Unit tests for the IR module

use super::*;
use pretty_assertions::assert_eq;

fn single_block() -> (IrBuilder, BlockId) {
    let mut builder = IrBuilder::new("test");
    let block = builder.create_block();
    (builder, block)
}

#[test]
fn test_operand_display() {
    assert_eq!(OperandKind::Register(3).to_string(), "r3");
    assert_eq!(OperandKind::Constant(-2).to_string(), "#-2");
    assert_eq!(
        OperandKind::ConstantBuffer { slot: 0, offset: 0x4c }.to_string(),
        "cb0[0x4c]"
    );
}

#[test]
fn test_instruction_regions() {
    let load = Instruction::Load(MemoryRegion::Global);
    assert_eq!(load.memory_region(), Some(MemoryRegion::Global));
    assert!(!load.is_storage());
    assert_eq!(
        load.with_region(MemoryRegion::Storage),
        Some(Instruction::Load(MemoryRegion::Storage))
    );

    let cas = Instruction::Atomic(AtomicOp::CompareAndSwap, MemoryRegion::Global);
    assert!(cas.is_atomic());
    assert_eq!(cas.arity(), SourceArity::Exactly(3));
    assert_eq!(
        cas.with_region(MemoryRegion::Storage),
        Some(Instruction::Atomic(AtomicOp::CompareAndSwap, MemoryRegion::Storage))
    );

    assert_eq!(Instruction::Add.with_region(MemoryRegion::Storage), None);
    assert_eq!(Instruction::LoadLocal.memory_region(), None);
}

#[test]
fn test_instruction_display() {
    assert_eq!(Instruction::Store(MemoryRegion::Global).to_string(), "store.global");
    assert_eq!(
        Instruction::Atomic(AtomicOp::MaxU32, MemoryRegion::Shared).to_string(),
        "atomic.max.u32.shared"
    );
}

#[test]
fn test_basic_block_cursors() {
    let mut block = BasicBlock::new(0);
    assert!(block.is_empty());

    let a = block.push(OperationId(0));
    let b = block.push(OperationId(1));
    let c = block.push(OperationId(2));
    assert_eq!(block.len(), 3);

    let inserted = block.insert_after(a, OperationId(10)).unwrap();
    assert_eq!(block.operations(), vec![OperationId(0), OperationId(10), OperationId(1), OperationId(2)]);

    assert_eq!(block.remove(b), Some(OperationId(1)));
    assert_eq!(block.get(b), None);
    assert_eq!(block.next(inserted), Some(c));
    assert_eq!(block.prev(c), Some(inserted));

    let replaced = block.replace(c, OperationId(20)).unwrap();
    assert_eq!(block.last(), Some(replaced));
    assert_eq!(block.operations(), vec![OperationId(0), OperationId(10), OperationId(20)]);

    assert_eq!(block.remove(a), Some(OperationId(0)));
    assert_eq!(block.first(), Some(inserted));
    assert_eq!(block.len(), 2);
    assert_eq!(block.position(OperationId(20)), Some(replaced));
}

#[test]
fn test_stale_cursor_is_rejected() {
    let mut block = BasicBlock::new(0);
    let a = block.push(OperationId(0));
    block.remove(a);

    assert_eq!(block.remove(a), None);
    assert_eq!(block.insert_after(a, OperationId(1)), None);
    assert!(block.is_empty());
}

#[test]
fn test_builder_links_producers_and_uses() {
    let (mut builder, block) = single_block();
    let base = builder.constant_buffer(0, 0x44);
    let offset = builder.register(2);
    let address = builder.build_add(base, offset).unwrap();
    let value = builder.build_load(MemoryRegion::Global, address).unwrap();
    builder.build_return().unwrap();
    assert!(builder.current_block_has_terminator());

    let function = builder.finish();
    let add = function.producer_of(address).unwrap();
    assert_eq!(function[add].instruction, Instruction::Add);
    assert_eq!(function[add].sources(), &[base, offset]);
    assert_eq!(function.producer_of(base), None);

    let load = function.producer_of(value).unwrap();
    assert_eq!(function[address].uses(), &[load]);
    assert_eq!(function.block(block).unwrap().len(), 3);
    function.validate().unwrap();
}

#[test]
fn test_constant_buffer_cannot_be_assigned() {
    let (mut builder, _) = single_block();
    let cbuf = builder.constant_buffer(0, 0x48);
    let source = builder.register(0);

    let err = builder
        .emit(Operation::new(Instruction::Copy, Some(cbuf), vec![source]))
        .unwrap_err();
    assert_eq!(err, IrError::ConstantBufferProducer { operand: cbuf });
}

#[test]
fn test_single_assignment_is_enforced() {
    let (mut builder, _) = single_block();
    let source = builder.register(0);
    let dest = builder.local();
    let first = builder
        .emit(Operation::new(Instruction::Copy, Some(dest), vec![source]))
        .unwrap();

    let err = builder
        .emit(Operation::new(Instruction::Copy, Some(dest), vec![source]))
        .unwrap_err();
    assert_eq!(err, IrError::MultipleProducers { operand: dest, existing: first });
}

#[test]
fn test_storage_index_checks() {
    let (mut builder, _) = single_block();
    let address = builder.register(1);

    assert!(matches!(
        builder.build_storage_load(16, address),
        Err(IrError::StorageIndexOutOfRange { index: 16, max: 16 })
    ));

    let dest = builder.local();
    assert!(matches!(
        builder.emit(Operation::new(Instruction::Load(MemoryRegion::Storage), Some(dest), vec![address])),
        Err(IrError::StorageIndexMismatch { .. })
    ));

    assert!(matches!(
        builder.emit(Operation::with_storage_index(
            Instruction::Load(MemoryRegion::Global),
            1,
            Some(dest),
            vec![address],
        )),
        Err(IrError::StorageIndexMismatch { .. })
    ));

    assert!(builder.build_storage_load(15, address).is_ok());
}

#[test]
fn test_source_count_checks() {
    let (mut builder, _) = single_block();
    let address = builder.register(1);

    let err = builder
        .emit(Operation::new(Instruction::Store(MemoryRegion::Global), None, vec![address]))
        .unwrap_err();
    assert!(matches!(err, IrError::SourceCount { found: 1, .. }));

    let err = builder
        .build_atomic(AtomicOp::CompareAndSwap, MemoryRegion::Global, address, &[address])
        .unwrap_err();
    assert!(matches!(err, IrError::SourceCount { found: 2, .. }));
}

#[test]
fn test_emit_without_block() {
    let mut builder = IrBuilder::new("no_block");
    let source = builder.register(0);
    assert_eq!(builder.build_copy(source).unwrap_err(), IrError::NoCurrentBlock);
    assert_eq!(builder.switch_to_block(3).unwrap_err(), IrError::UnknownBlock(3));
}

#[test]
fn test_clear_sources_releases_uses() {
    let (mut builder, _) = single_block();
    let address = builder.register(4);
    let value = builder.register(5);
    let store = builder.build_store(MemoryRegion::Global, address, value).unwrap();
    let mut function = builder.finish();

    assert_eq!(function[value].uses(), &[store]);
    function.clear_sources(store);
    assert!(function[address].is_unused());
    assert!(function[value].is_unused());
    assert!(function[store].sources().is_empty());
}

#[test]
fn test_set_source_moves_use() {
    let (mut builder, _) = single_block();
    let a = builder.register(0);
    let b = builder.register(1);
    let copy = builder.build_copy(a).unwrap();
    let mut function = builder.finish();
    let op = function.producer_of(copy).unwrap();

    function.set_source(op, 0, b).unwrap();
    assert!(function[a].is_unused());
    assert_eq!(function[b].uses(), &[op]);
    assert!(matches!(function.set_source(op, 1, b), Err(IrError::SourceCount { .. })));
}

#[test]
fn test_replace_operation_moves_producer() {
    let (mut builder, block) = single_block();
    let address = builder.register(4);
    let value = builder.build_load(MemoryRegion::Global, address).unwrap();
    let mut function = builder.finish();
    let old = function.producer_of(value).unwrap();

    let replacement = Operation::with_storage_index(
        Instruction::Load(MemoryRegion::Storage),
        7,
        Some(value),
        vec![address],
    );
    function.clear_sources(old);
    let new = function.replace_operation(old, replacement);

    let block = function.block_mut(block).unwrap();
    let cursor = block.position(old).unwrap();
    block.replace(cursor, new).unwrap();

    assert_eq!(function.producer_of(value), Some(new));
    assert_eq!(function[old].dest(), None);
    assert_eq!(function[address].uses(), &[new]);
    function.validate().unwrap();
}

#[test]
fn test_json_round_trip() {
    let (mut builder, block) = single_block();
    let base = builder.constant_buffer(0, 0x48);
    let address = builder.build_copy(base).unwrap();
    let value = builder.register(3);
    builder.build_store(MemoryRegion::Global, address, value).unwrap();
    let function = builder.finish();

    let text = function.to_json().unwrap();
    let loaded = Function::from_json(&text).unwrap();
    assert_eq!(loaded, function);
    assert_eq!(loaded.block(block).unwrap().len(), 2);
}

#[test]
fn test_json_rejects_assigned_constant_buffer() {
    let text = r#"{
        "name": "bad",
        "operands": [
            { "kind": { "register": 0 } },
            { "kind": { "constant_buffer": { "slot": 0, "offset": 72 } } }
        ],
        "operations": [
            { "instruction": "copy", "dest": 1, "sources": [0] }
        ],
        "blocks": [ { "id": 0, "operations": [0] } ]
    }"#;
    assert_eq!(
        Function::from_json(text).unwrap_err(),
        IrError::ConstantBufferProducer { operand: OperandId(1) }
    );
}

#[test]
fn test_json_rejects_dangling_operand() {
    let text = r#"{
        "name": "bad",
        "operands": [ { "kind": "local_variable" } ],
        "operations": [
            { "instruction": { "load": "global" }, "dest": 0, "sources": [9] }
        ],
        "blocks": []
    }"#;
    assert_eq!(
        Function::from_json(text).unwrap_err(),
        IrError::UnknownOperand(OperandId(9))
    );
}

#[test]
fn test_json_rejects_duplicate_placement() {
    let text = r#"{
        "name": "bad",
        "operands": [
            { "kind": { "constant_buffer": { "slot": 0, "offset": 68 } } },
            { "kind": { "constant_buffer": { "slot": 0, "offset": 69 } } },
            { "kind": { "register": 0 } },
            { "kind": { "register": 1 } }
        ],
        "operations": [
            { "instruction": "pack_double2x32", "dest": 2, "sources": [0, 1] },
            { "instruction": { "load": "global" }, "dest": 3, "sources": [2] }
        ],
        "blocks": [ { "id": 0, "operations": [0, 1, 1] } ]
    }"#;
    assert_eq!(
        Function::from_json(text).unwrap_err(),
        IrError::InvalidInstruction {
            message: "op1 is placed more than once".to_string(),
        }
    );
}

#[test]
fn test_validate_rejects_operation_in_two_blocks() {
    let (mut builder, _) = single_block();
    let base = builder.constant_buffer(0, 0x44);
    builder.build_copy(base).unwrap();
    let mut function = builder.finish();
    let copy = function.blocks[0].operations()[0];

    let second = function.add_block();
    function.block_mut(second).unwrap().push(copy);

    assert_eq!(
        function.validate().unwrap_err(),
        IrError::InvalidInstruction {
            message: format!("{copy} is placed more than once"),
        }
    );
}

#[test]
fn test_function_display() {
    let (mut builder, _) = single_block();
    let base = builder.constant_buffer(0, 0x4c);
    let address = builder.build_copy(base).unwrap();
    builder.build_storage_load(2, address).unwrap();
    let function = builder.finish();

    assert_eq!(
        function.to_string(),
        "function test {\nblock0:\n    %1 = copy cb0[0x4c]\n    %2 = load.storage[2] %1\n}"
    );
}
