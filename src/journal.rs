//! Journal - owner of a hot-block tracker.
//!
//! A [`Journal`] holds at most one [`HotBlockTracker`] and is the only way to
//! reach it. The journal's write, checkpoint and shutdown paths call the
//! methods here; hot-block tracking is advisory, so every failure is
//! reported to the caller without affecting the journal itself.
//!
//! # Lifecycle
//! ```text
//!  Journal::new ──▶ Uninitialized
//!                       │ init_hot_blocks
//!                       ▼
//!                     Active ◀── record / report / reset
//!                       │ cleanup_hot_blocks
//!                       ▼
//!                    Destroyed   (terminal)
//! ```

use std::mem;

use lock_api::RawMutex;
use tracing::{debug, info, warn};

use crate::common::{BlockNumber, Error, Lifecycle, Result, TrackerConfig};
use crate::tracker::{AtomicAlloc, EntryAllocator, HotBlockTracker, HotBlocks, SpinRawMutex};

enum TrackerSlot<A, R> {
    Uninitialized,
    Active(HotBlockTracker<A, R>),
    Destroyed,
}

/// Journal context owning the hot-block tracker.
///
/// Share it across writer and checkpoint threads with `Arc<Journal>`.
/// Teardown takes `&mut self`, so it can only happen once every other
/// reference is gone.
///
/// # Example
/// ```
/// use hotblocks::{Journal, Lifecycle, TrackerConfig};
///
/// let mut journal = Journal::new("sda1-8");
/// journal.init_hot_blocks(TrackerConfig::default().with_hot_threshold(3))?;
///
/// for _ in 0..4 {
///     journal.record_block_access(200)?;
/// }
/// journal.record_block_access(100)?;
/// assert_eq!(journal.hot_blocks().to_pairs(), vec![(200, 4)]);
///
/// journal.cleanup_hot_blocks();
/// assert_eq!(journal.lifecycle(), Lifecycle::Destroyed);
/// # Ok::<(), hotblocks::Error>(())
/// ```
pub struct Journal<A = AtomicAlloc, R = SpinRawMutex> {
    /// Device name used in reports.
    devname: String,

    hot_track: TrackerSlot<A, R>,
}

impl Journal {
    /// Create a journal with the default tracker types. No tracker yet.
    pub fn new(devname: impl Into<String>) -> Self {
        Self::with_devname(devname)
    }
}

impl<A: EntryAllocator, R: RawMutex> Journal<A, R> {
    /// Create a journal for any allocator and lock type. No tracker yet.
    pub fn with_devname(devname: impl Into<String>) -> Self {
        Self {
            devname: devname.into(),
            hot_track: TrackerSlot::Uninitialized,
        }
    }

    pub fn devname(&self) -> &str {
        &self.devname
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.hot_track {
            TrackerSlot::Uninitialized => Lifecycle::Uninitialized,
            TrackerSlot::Active(_) => Lifecycle::Active,
            TrackerSlot::Destroyed => Lifecycle::Destroyed,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create the tracker with a default-constructed allocator.
    ///
    /// # Errors
    /// See [`init_hot_blocks_with`](Self::init_hot_blocks_with).
    pub fn init_hot_blocks(&mut self, config: TrackerConfig) -> Result<()>
    where
        A: Default,
    {
        self.init_hot_blocks_with(config, A::default())
    }

    /// Create the tracker, moving the journal to `Active`.
    ///
    /// # Errors
    /// - `Error::InvalidState` if a tracker was already created (live or
    ///   destroyed). The existing state is kept.
    /// - `Error::OutOfMemory` if the tracker cannot be allocated. The journal
    ///   stays `Uninitialized` and can keep running without tracking.
    pub fn init_hot_blocks_with(&mut self, config: TrackerConfig, allocator: A) -> Result<()> {
        let state = self.lifecycle();
        if state != Lifecycle::Uninitialized {
            return Err(Error::InvalidState { state });
        }

        match HotBlockTracker::with_allocator(config, allocator) {
            Ok(tracker) => {
                self.hot_track = TrackerSlot::Active(tracker);
                debug!(journal = %self.devname, "hot-block tracking enabled");
                Ok(())
            }
            Err(err) => {
                warn!(
                    journal = %self.devname,
                    error = %err,
                    "hot-block tracking unavailable"
                );
                Err(err)
            }
        }
    }

    /// Destroy the tracker and every entry in it. Returns the number of
    /// entries freed.
    ///
    /// A no-op returning 0 when there is no live tracker.
    pub fn cleanup_hot_blocks(&mut self) -> usize {
        match mem::replace(&mut self.hot_track, TrackerSlot::Destroyed) {
            TrackerSlot::Active(tracker) => {
                let freed = tracker.destroy();
                debug!(journal = %self.devname, freed, "hot-block tracking shut down");
                freed
            }
            other => {
                self.hot_track = other;
                0
            }
        }
    }

    // ========================================================================
    // Tracker operations
    // ========================================================================

    /// The live tracker.
    ///
    /// # Errors
    /// `Error::InvalidState` unless the journal is `Active`.
    pub fn tracker(&self) -> Result<&HotBlockTracker<A, R>> {
        match &self.hot_track {
            TrackerSlot::Active(tracker) => Ok(tracker),
            _ => Err(Error::InvalidState {
                state: self.lifecycle(),
            }),
        }
    }

    /// Record a write-back of block `blocknr`.
    ///
    /// # Errors
    /// - `Error::InvalidState` if the journal has no live tracker. Nothing
    ///   is recorded.
    /// - `Error::OutOfMemory` if the access had to be dropped.
    pub fn record_block_access(&self, blocknr: u64) -> Result<()> {
        self.tracker()?.record_access(BlockNumber::new(blocknr))
    }

    /// Current hot blocks. Empty when there is no live tracker.
    pub fn hot_blocks(&self) -> HotBlocks {
        match &self.hot_track {
            TrackerSlot::Active(tracker) => tracker.hot_blocks(),
            _ => HotBlocks::empty(),
        }
    }

    /// Log the hot blocks at `INFO`, one line per block, while holding the
    /// tracker lock. Does nothing when there is no live tracker.
    pub fn print_hot_blocks(&self) {
        let TrackerSlot::Active(tracker) = &self.hot_track else {
            return;
        };

        info!(journal = %self.devname, "Hot blocks in journal {}:", self.devname);
        tracker.for_each_hot_block(|counter| {
            info!(journal = %self.devname, "  {}", counter);
        });
    }

    /// Zero every counter after a checkpoint. Does nothing when there is no
    /// live tracker.
    pub fn reset_all_block_counts(&self) {
        if let TrackerSlot::Active(tracker) = &self.hot_track {
            tracker.reset_all_counts();
        }
    }
}
