//! Configuration for hot-block tracking.

/// Default tracking window, in journal blocks.
///
/// Recorded on every tracker for the journal to consume. The tracker itself
/// never enforces it: entries accumulate for the tracker's whole lifetime.
pub const DEFAULT_HOT_BLOCK_WINDOW: u32 = 1024;

/// Default minimum access count for a block to be reported as hot.
pub const DEFAULT_HOT_THRESHOLD: u64 = 10;

/// Number of entry slots reserved when a tracker is created.
///
/// This is the only allocation allowed to block. Inserts beyond it go through
/// the tracker's [`EntryAllocator`](crate::tracker::EntryAllocator).
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Tunables for a single [`HotBlockTracker`](crate::HotBlockTracker).
///
/// # Example
/// ```
/// use hotblocks::TrackerConfig;
///
/// let config = TrackerConfig::default()
///     .with_hot_threshold(3)
///     .with_initial_capacity(16);
/// assert_eq!(config.hot_threshold, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Tracking window size (informational).
    pub window_size: u32,

    /// Minimum access count for a block to be hot. Zero makes every tracked
    /// block hot.
    pub hot_threshold: u64,

    /// Entry slots reserved up front.
    pub initial_capacity: usize,
}

impl TrackerConfig {
    /// Create a config with the given window and threshold.
    pub fn new(window_size: u32, hot_threshold: u64) -> Self {
        Self {
            window_size,
            hot_threshold,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_hot_threshold(mut self, hot_threshold: u64) -> Self {
        self.hot_threshold = hot_threshold;
        self
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOT_BLOCK_WINDOW, DEFAULT_HOT_THRESHOLD)
    }
}
