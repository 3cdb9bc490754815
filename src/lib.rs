//! hotblocks - hot-block access tracking for write-ahead journals.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Journal (write / checkpoint / shutdown)         │
//! │   record_block_access   print_hot_blocks   reset   cleanup      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       HotBlockTracker                           │
//! │  ┌───────────────────────────────────────────────────────────┐  │
//! │  │        lock (spin by default, parking_lot optional)       │  │
//! │  │  ┌─────────────────────────────────────────────────────┐  │  │
//! │  │  │   BlockIndex: red-black tree, BlockNumber → count   │  │  │
//! │  │  └─────────────────────────────────────────────────────┘  │  │
//! │  └───────────────────────────────────────────────────────────┘  │
//! │        EntryAllocator (fail-fast)        TrackerStats           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (BlockNumber, Error, config, Lifecycle)
//! - [`tracker`] - The tracker, its index and allocation strategies
//! - [`journal`] - The journal context that owns a tracker
//!
//! # Quick Start
//! ```
//! use hotblocks::{Journal, TrackerConfig};
//!
//! let mut journal = Journal::new("sda1-8");
//! journal.init_hot_blocks(TrackerConfig::default().with_hot_threshold(2))?;
//!
//! journal.record_block_access(4096)?;
//! journal.record_block_access(4096)?;
//!
//! // At checkpoint
//! journal.print_hot_blocks();
//! journal.reset_all_block_counts();
//!
//! // At unmount
//! journal.cleanup_hot_blocks();
//! # Ok::<(), hotblocks::Error>(())
//! ```

pub mod common;
pub mod journal;
pub mod tracker;

pub use common::config::{
    DEFAULT_HOT_BLOCK_WINDOW, DEFAULT_HOT_THRESHOLD, DEFAULT_INITIAL_CAPACITY,
};
pub use common::{BlockNumber, Error, Lifecycle, Result, TrackerConfig};

pub use journal::Journal;
pub use tracker::{
    AtomicAlloc, BlockCounter, EntryAllocator, HotBlockTracker, HotBlocks, ParkingRawMutex,
    PreReservedAlloc, SpinRawMutex, StatsSnapshot, TrackerStats,
};
