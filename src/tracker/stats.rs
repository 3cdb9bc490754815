//! Tracker statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing how a tracker has been used.
///
/// All fields are atomic and updated with `Ordering::Relaxed`. They are
/// diagnostics only and carry no synchronization with the index itself.
///
/// # Example
/// ```
/// use hotblocks::TrackerStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TrackerStats::new();
/// stats.accesses_recorded.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().accesses_recorded, 1);
/// ```
#[derive(Debug, Default)]
pub struct TrackerStats {
    /// Accesses that incremented a counter.
    pub accesses_recorded: AtomicU64,

    /// Entries created by a first access.
    pub entries_created: AtomicU64,

    /// Accesses dropped because no entry could be allocated.
    pub accesses_dropped: AtomicU64,

    /// Calls to reset all counts.
    pub resets: AtomicU64,
}

impl TrackerStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a plain copy of the counters for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            accesses_recorded: self.accesses_recorded.load(Ordering::Relaxed),
            entries_created: self.entries_created.load(Ordering::Relaxed),
            accesses_dropped: self.accesses_dropped.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`TrackerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub accesses_recorded: u64,
    pub entries_created: u64,
    pub accesses_dropped: u64,
    pub resets: u64,
}

impl StatsSnapshot {
    /// Fraction of access events that were dropped (0.0 to 1.0).
    pub fn drop_rate(&self) -> f64 {
        let total = self.accesses_recorded + self.accesses_dropped;
        if total == 0 {
            0.0
        } else {
            self.accesses_dropped as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ recorded: {}, entries: {}, dropped: {}, resets: {}, drop_rate: {:.2}% }}",
            self.accesses_recorded,
            self.entries_created,
            self.accesses_dropped,
            self.resets,
            self.drop_rate() * 100.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = TrackerStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
        assert_eq!(stats.snapshot().drop_rate(), 0.0);
    }

    #[test]
    fn test_drop_rate() {
        let stats = TrackerStats::new();
        stats.accesses_recorded.fetch_add(3, Ordering::Relaxed);
        stats.accesses_dropped.fetch_add(1, Ordering::Relaxed);

        assert_eq!(stats.snapshot().drop_rate(), 0.25);
    }

    #[test]
    fn test_stats_display() {
        let stats = TrackerStats::new();
        stats.accesses_recorded.fetch_add(80, Ordering::Relaxed);
        stats.entries_created.fetch_add(12, Ordering::Relaxed);
        stats.accesses_dropped.fetch_add(20, Ordering::Relaxed);

        let display = format!("{}", stats.snapshot());
        assert!(display.contains("recorded: 80"));
        assert!(display.contains("entries: 12"));
        assert!(display.contains("20.00%"));
    }
}
