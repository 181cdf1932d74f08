//! Ordered, name-keyed collection of the current blocks.

use crate::block::Block;

/// The aggregator's authoritative block collection.
///
/// Holds at most one block per name and is always sorted ascending by
/// `sort_order`. Blocks with equal `sort_order` keep their relative insertion
/// order, so a replaced block moves behind its equals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockStore {
    blocks: Vec<Block>,
}

impl BlockStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Inserts `block`, replacing any block with the same name.
    ///
    /// Replacement is whole-record: no attributes survive from the previous
    /// block.
    pub fn upsert(&mut self, block: Block) {
        self.remove(block.name());
        self.blocks.push(block);
        self.blocks.sort_by_key(Block::sort_order);
    }

    /// Removes the block called `name`. Returns whether a block was removed;
    /// removing an absent name is not an error.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|block| block.name() != name);
        self.blocks.len() != before
    }

    /// The current blocks in render order.
    #[must_use]
    pub fn snapshot(&self) -> &[Block] {
        &self.blocks
    }

    /// Smallest `sort_order` present, or `None` when the store is empty.
    #[must_use]
    pub fn lowest_sort_order(&self) -> Option<i64> {
        self.blocks.iter().map(Block::sort_order).min()
    }

    /// Looks up a block by exact, case-sensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.name() == name)
    }

    /// Number of stored blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the store holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
