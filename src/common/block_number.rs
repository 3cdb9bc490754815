//! Block number type.

use std::fmt;

/// Identifies a block on the journaled device.
///
/// Using `u64` to match the 64-bit block addressing of large journals.
/// Ordering is by raw block number, which is the order hot-block reports
/// are produced in.
///
/// # Example
/// ```
/// use hotblocks::BlockNumber;
///
/// let block = BlockNumber::new(100);
/// assert!(block < BlockNumber::new(200));
/// assert_eq!(block.0, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockNumber(pub u64);

impl BlockNumber {
    /// Create a new BlockNumber.
    #[inline]
    pub fn new(blocknr: u64) -> Self {
        BlockNumber(blocknr)
    }
}

impl From<u64> for BlockNumber {
    fn from(blocknr: u64) -> Self {
        BlockNumber(blocknr)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({})", self.0)
    }
}
