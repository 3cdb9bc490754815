//! BlockCounter - one tracked block and its access count.

use std::fmt;

use crate::common::BlockNumber;

/// Access count for a single block.
///
/// Counters live inside the tracker's index and are only mutated while the
/// tracker lock is held. Reports hand out copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCounter {
    block: BlockNumber,
    count: u64,
}

impl BlockCounter {
    /// Create a counter with an explicit count.
    #[inline]
    pub fn new(block: BlockNumber, count: u64) -> Self {
        Self { block, count }
    }

    /// Counter for a block seen for the first time.
    #[inline]
    pub(crate) fn first_access(block: BlockNumber) -> Self {
        Self::new(block, 1)
    }

    #[inline]
    pub fn block(&self) -> BlockNumber {
        self.block
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub(crate) fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.count = 0;
    }
}

impl fmt::Display for BlockCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block {}: {} accesses", self.block.0, self.count)
    }
}
