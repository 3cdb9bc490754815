//! Hot-Block Tracker - per-block access counting under a single lock.
//!
//! The [`HotBlockTracker`] provides:
//! - Find-or-create access counting on the journal write path
//! - Threshold-filtered, ascending hot-block reports for checkpoints
//! - Bulk counter reset after a checkpoint completes
//! - Teardown of every entry at journal shutdown

use std::sync::atomic::Ordering;

use lock_api::{Mutex, RawMutex};
use tracing::{debug, warn};

use crate::common::{BlockNumber, Error, Result, TrackerConfig};
use crate::tracker::alloc::{AtomicAlloc, EntryAllocator};
use crate::tracker::{BlockCounter, BlockIndex, HotBlocks, TrackerStats};

/// Spinning raw mutex used by default.
///
/// The record path may run where the caller cannot sleep, so the default
/// lock busy-waits instead of parking the thread.
pub type SpinRawMutex = spin::Mutex<()>;

/// Parking raw mutex for journals whose writers may sleep.
pub type ParkingRawMutex = parking_lot::RawMutex;

/// Access counters for journal blocks.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────┐
/// │                   HotBlockTracker                     │
/// │  ┌─────────────────────────────────────────────────┐  │
/// │  │ index: Mutex<R, BlockIndex>                     │  │
/// │  │   red-black tree, BlockNumber → BlockCounter    │  │
/// │  └─────────────────────────────────────────────────┘  │
/// │  ┌──────────────┐  ┌──────────────┐  ┌────────────┐   │
/// │  │  allocator   │  │ window_size  │  │   stats    │   │
/// │  │ A: EntryAll. │  │ hot_threshold│  │  (atomic)  │   │
/// │  └──────────────┘  └──────────────┘  └────────────┘   │
/// └───────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `index`: one lock for the whole tree and every counter in it
/// - `window_size`, `hot_threshold`: immutable after construction
/// - `stats`: no lock, atomic counters
///
/// Every operation takes the lock exactly once, so each appears atomic to
/// the others. [`destroy`](Self::destroy) consumes the tracker, which means
/// no other thread can still be using it.
///
/// # Type Parameters
/// - `A`: how new entries are allocated on the record path
/// - `R`: the raw lock; [`SpinRawMutex`] by default, or [`ParkingRawMutex`]
///   for journals running on ordinary threads
///
/// # Example
/// ```
/// use hotblocks::{BlockNumber, HotBlockTracker, TrackerConfig};
///
/// let tracker = HotBlockTracker::new(TrackerConfig::default().with_hot_threshold(2))?;
/// tracker.record_access(BlockNumber::new(7))?;
/// tracker.record_access(BlockNumber::new(7))?;
///
/// let report = tracker.hot_blocks();
/// assert_eq!(report.to_pairs(), vec![(7, 2)]);
/// # Ok::<(), hotblocks::Error>(())
/// ```
pub struct HotBlockTracker<A = AtomicAlloc, R = SpinRawMutex> {
    /// Ordered counters, guarded by the tracker lock.
    index: Mutex<R, BlockIndex>,

    /// Allocation strategy for first accesses.
    allocator: A,

    /// Tracking window, recorded for the journal.
    window_size: u32,

    /// Minimum count for a block to be reported hot.
    hot_threshold: u64,

    /// Usage statistics.
    stats: TrackerStats,
}

impl HotBlockTracker {
    /// Create a tracker with the default allocator and spin lock.
    ///
    /// # Errors
    /// `Error::OutOfMemory` if the initial slots cannot be reserved.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        Self::with_allocator(config, AtomicAlloc)
    }
}

impl<A: EntryAllocator, R: RawMutex> HotBlockTracker<A, R> {
    /// Create a tracker that allocates new entries through `allocator`.
    ///
    /// `config.initial_capacity` slots are reserved here. This is the one
    /// allocation that is allowed to block.
    ///
    /// # Errors
    /// `Error::OutOfMemory` if the initial slots cannot be reserved.
    pub fn with_allocator(config: TrackerConfig, allocator: A) -> Result<Self> {
        let index = BlockIndex::with_capacity(config.initial_capacity)?;

        debug!(
            window_size = config.window_size,
            hot_threshold = config.hot_threshold,
            initial_capacity = config.initial_capacity,
            "hot-block tracker created"
        );

        Ok(Self {
            index: Mutex::new(index),
            allocator,
            window_size: config.window_size,
            hot_threshold: config.hot_threshold,
            stats: TrackerStats::new(),
        })
    }

    // ========================================================================
    // Public API: Record path
    // ========================================================================

    /// Count one access to `block`, creating its entry on first access.
    ///
    /// # Errors
    /// `Error::OutOfMemory` if a new entry is needed and the allocator cannot
    /// provide one. The access is dropped and the index is unchanged.
    pub fn record_access(&self, block: BlockNumber) -> Result<()> {
        let mut index = self.index.lock();

        // Fast path: block already tracked
        if let Some(counter) = index.get_mut(block) {
            counter.increment();
            self.stats.accesses_recorded.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        if let Err(err) = index.reserve_entry(&self.allocator) {
            drop(index);
            self.stats.accesses_dropped.fetch_add(1, Ordering::Relaxed);
            debug!(blocknr = block.0, error = %err, "dropped block access");
            return Err(err);
        }

        match index.insert(BlockCounter::first_access(block)) {
            Ok(()) => {
                drop(index);
                self.stats.entries_created.fetch_add(1, Ordering::Relaxed);
                self.stats.accesses_recorded.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(Error::DuplicateKey(block)) => {
                drop(index);
                warn!(blocknr = block.0, "block counter already present, discarding new entry");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    // ========================================================================
    // Public API: Reporting
    // ========================================================================

    /// Call `f` for each hot block in ascending block order.
    ///
    /// The lock is held for the whole walk, so `f` sees one consistent
    /// state and must not call back into this tracker.
    pub fn for_each_hot_block<F>(&self, f: F)
    where
        F: FnMut(&BlockCounter),
    {
        let index = self.index.lock();
        index
            .iter()
            .filter(|counter| counter.count() >= self.hot_threshold)
            .for_each(f);
    }

    /// Collect the current hot blocks into an owned report.
    pub fn hot_blocks(&self) -> HotBlocks {
        let mut blocks = Vec::new();
        self.for_each_hot_block(|counter| blocks.push(*counter));
        HotBlocks::new(blocks)
    }

    // ========================================================================
    // Public API: Maintenance
    // ========================================================================

    /// Zero every counter. Entries stay in the index.
    pub fn reset_all_counts(&self) {
        let mut index = self.index.lock();
        for counter in index.counters_mut() {
            counter.reset();
        }
        let tracked = index.len();
        drop(index);

        self.stats.resets.fetch_add(1, Ordering::Relaxed);
        debug!(tracked, "hot-block counters reset");
    }

    /// Free every entry and the tracker itself. Returns the number of
    /// entries freed.
    pub fn destroy(self) -> usize {
        let mut index = self.index.into_inner();
        let freed = index.clear();
        debug!(freed, "hot-block tracker destroyed");
        freed
    }

    // ========================================================================
    // Public API: Introspection
    // ========================================================================

    /// Current count for `block`, or `None` if it was never accessed.
    pub fn access_count(&self, block: BlockNumber) -> Option<u64> {
        self.index.lock().get(block).map(BlockCounter::count)
    }

    /// Every tracked block, hot or not, in ascending order.
    pub fn tracked_blocks(&self) -> Vec<BlockNumber> {
        self.index.lock().iter().map(BlockCounter::block).collect()
    }

    /// Number of tracked blocks.
    pub fn len(&self) -> usize {
        self.index.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.lock().is_empty()
    }

    #[inline]
    pub fn window_size(&self) -> u32 {
        self.window_size
    }

    #[inline]
    pub fn hot_threshold(&self) -> u64 {
        self.hot_threshold
    }

    #[inline]
    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }
}
