//! HotBlocks - an owned hot-block report.

use std::fmt;
use std::slice;

use crate::tracker::BlockCounter;

/// Hot blocks captured under a single hold of the tracker lock.
///
/// Entries are in strictly ascending block order and every count is at or
/// above the threshold the report was taken with. The report can be iterated
/// any number of times.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotBlocks {
    blocks: Vec<BlockCounter>,
}

impl HotBlocks {
    pub(crate) fn new(blocks: Vec<BlockCounter>) -> Self {
        Self { blocks }
    }

    /// A report with nothing in it.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, BlockCounter> {
        self.blocks.iter()
    }

    pub fn as_slice(&self) -> &[BlockCounter] {
        &self.blocks
    }

    /// `(block number, access count)` pairs.
    pub fn to_pairs(&self) -> Vec<(u64, u64)> {
        self.blocks.iter().map(|c| (c.block().0, c.count())).collect()
    }
}

impl<'a> IntoIterator for &'a HotBlocks {
    type Item = &'a BlockCounter;
    type IntoIter = slice::Iter<'a, BlockCounter>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

impl IntoIterator for HotBlocks {
    type Item = BlockCounter;
    type IntoIter = std::vec::IntoIter<BlockCounter>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.into_iter()
    }
}

impl fmt::Display for HotBlocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for counter in &self.blocks {
            writeln!(f, "  {}", counter)?;
        }
        Ok(())
    }
}
