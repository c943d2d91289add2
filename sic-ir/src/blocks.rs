//! Basic Block Management
//!
//! Defines basic blocks - ordered sequences of operations with a single
//! entry and exit. The operation list is an index-linked list over a slot
//! vector, so cursors stay valid while neighbouring entries are inserted
//! or removed.

use sic_common::{BlockId, OperationId};
use serde::{Deserialize, Serialize};

/// Stable position of an operation inside a [`BasicBlock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(u32);

#[derive(Debug, Clone)]
struct Node {
    operation: OperationId,
    prev: Option<Cursor>,
    next: Option<Cursor>,
}

/// Basic Block - a sequence of operations with a single entry and exit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "BlockRepr", into = "BlockRepr")]
pub struct BasicBlock {
    pub id: BlockId,
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
    head: Option<Cursor>,
    tail: Option<Cursor>,
    len: usize,
}

/// Serialized form: the operations in program order
#[derive(Serialize, Deserialize)]
struct BlockRepr {
    id: BlockId,
    operations: Vec<OperationId>,
}

impl From<BlockRepr> for BasicBlock {
    fn from(repr: BlockRepr) -> Self {
        let mut block = BasicBlock::new(repr.id);
        for operation in repr.operations {
            block.push(operation);
        }
        block
    }
}

impl From<BasicBlock> for BlockRepr {
    fn from(block: BasicBlock) -> Self {
        BlockRepr {
            id: block.id,
            operations: block.operations(),
        }
    }
}

impl PartialEq for BasicBlock {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.iter().eq(other.iter())
    }
}

impl BasicBlock {
    pub fn new(id: BlockId) -> Self {
        Self {
            id,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn first(&self) -> Option<Cursor> {
        self.head
    }

    pub fn last(&self) -> Option<Cursor> {
        self.tail
    }

    /// Operation at `cursor`, or `None` if the cursor was removed
    pub fn get(&self, cursor: Cursor) -> Option<OperationId> {
        self.node(cursor).map(|node| node.operation)
    }

    pub fn next(&self, cursor: Cursor) -> Option<Cursor> {
        self.node(cursor).and_then(|node| node.next)
    }

    pub fn prev(&self, cursor: Cursor) -> Option<Cursor> {
        self.node(cursor).and_then(|node| node.prev)
    }

    /// Append an operation at the end of the block
    pub fn push(&mut self, operation: OperationId) -> Cursor {
        let prev = self.tail;
        let cursor = self.alloc(Node { operation, prev, next: None });
        match prev {
            Some(prev) => self.link_next(prev, Some(cursor)),
            None => self.head = Some(cursor),
        }
        self.tail = Some(cursor);
        cursor
    }

    /// Insert `operation` right after `cursor`
    pub fn insert_after(&mut self, cursor: Cursor, operation: OperationId) -> Option<Cursor> {
        let next = self.node(cursor)?.next;
        let inserted = self.alloc(Node { operation, prev: Some(cursor), next });
        self.link_next(cursor, Some(inserted));
        match next {
            Some(next) => self.link_prev(next, Some(inserted)),
            None => self.tail = Some(inserted),
        }
        Some(inserted)
    }

    /// Unlink the operation at `cursor`, returning it
    ///
    /// Other cursors into the block remain valid.
    pub fn remove(&mut self, cursor: Cursor) -> Option<OperationId> {
        let node = self.slots.get_mut(cursor.0 as usize)?.take()?;
        match node.prev {
            Some(prev) => self.link_next(prev, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.link_prev(next, node.prev),
            None => self.tail = node.prev,
        }
        self.free.push(cursor.0);
        self.len -= 1;
        Some(node.operation)
    }

    /// Put `operation` in place of the one at `cursor`
    ///
    /// Returns the cursor of the new entry; the old cursor becomes stale.
    pub fn replace(&mut self, cursor: Cursor, operation: OperationId) -> Option<Cursor> {
        let inserted = self.insert_after(cursor, operation)?;
        self.remove(cursor);
        Some(inserted)
    }

    /// Operations in program order
    pub fn iter(&self) -> impl Iterator<Item = OperationId> + '_ {
        std::iter::successors(self.head, move |&cursor| self.next(cursor))
            .filter_map(move |cursor| self.get(cursor))
    }

    pub fn operations(&self) -> Vec<OperationId> {
        self.iter().collect()
    }

    /// Cursor of the first entry holding `operation`
    pub fn position(&self, operation: OperationId) -> Option<Cursor> {
        std::iter::successors(self.head, move |&cursor| self.next(cursor))
            .find(|&cursor| self.get(cursor) == Some(operation))
    }

    fn node(&self, cursor: Cursor) -> Option<&Node> {
        self.slots.get(cursor.0 as usize).and_then(Option::as_ref)
    }

    fn alloc(&mut self, node: Node) -> Cursor {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index as usize] = Some(node);
                Cursor(index)
            }
            None => {
                self.slots.push(Some(node));
                Cursor((self.slots.len() - 1) as u32)
            }
        }
    }

    fn link_next(&mut self, cursor: Cursor, next: Option<Cursor>) {
        if let Some(Some(node)) = self.slots.get_mut(cursor.0 as usize) {
            node.next = next;
        }
    }

    fn link_prev(&mut self, cursor: Cursor, prev: Option<Cursor>) {
        if let Some(Some(node)) = self.slots.get_mut(cursor.0 as usize) {
            node.prev = prev;
        }
    }
}
