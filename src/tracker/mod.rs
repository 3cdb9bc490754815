//! Hot-block tracking.
//!
//! Counts how often each journal block is written back, so the checkpoint
//! path can see which blocks are hot.
//!
//! # Components
//! - [`HotBlockTracker`] - The lock-guarded tracker
//! - [`BlockIndex`] - Arena-backed red-black tree of counters
//! - [`BlockCounter`] - One block and its access count
//! - [`HotBlocks`] - Owned, ascending hot-block report
//! - [`TrackerStats`] - Usage statistics
//! - [`EntryAllocator`] - Non-blocking allocation for new entries

mod alloc;
mod counter;
mod hot_block_tracker;
mod index;
mod report;
mod stats;

pub use alloc::{AtomicAlloc, EntryAllocator, PreReservedAlloc};
pub use counter::BlockCounter;
pub use hot_block_tracker::{HotBlockTracker, ParkingRawMutex, SpinRawMutex};
pub use index::{BlockIndex, Iter};
pub use report::HotBlocks;
pub use stats::{StatsSnapshot, TrackerStats};
