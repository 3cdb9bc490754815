//! Integration tests for a journal's hot-block tracking.
//!
//! Writers, a checkpointer and shutdown running against one shared journal.

use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

use hotblocks::{Error, Journal, Lifecycle, TrackerConfig};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Route tracker logs to the test harness. Set `RUST_LOG=hotblocks=debug`
/// to see them.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Log sink that appends formatted events to a shared buffer.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with `INFO` events on this thread going to the returned buffer.
fn capture_logs(f: impl FnOnce()) -> String {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

fn create_journal(hot_threshold: u64) -> Journal {
    init_tracing();
    let mut journal = Journal::new("loop0-8");
    journal
        .init_hot_blocks(TrackerConfig::default().with_hot_threshold(hot_threshold))
        .unwrap();
    journal
}

/// Concurrent writers on overlapping blocks lose no increments.
#[test]
fn test_concurrent_writers_exact_counts() {
    let journal = Arc::new(create_journal(1));
    let mut handles = vec![];

    for t in 0..8u64 {
        let journal_clone = Arc::clone(&journal);
        handles.push(thread::spawn(move || {
            for i in 0..1000u64 {
                // Block i % 16 is shared by all threads; 1000 + t is private
                journal_clone.record_block_access(i % 16).unwrap();
                journal_clone.record_block_access(1000 + t).unwrap();
            }
        }));
    }

    for h in handles {
        h.join().unwrap();
    }

    let report = journal.hot_blocks();
    assert_eq!(report.len(), 16 + 8);

    for counter in &report {
        if counter.block().0 < 16 {
            // 1000 / 16 = 62.5 per thread: blocks 0..8 get 63, 8..16 get 62
            let per_thread = if counter.block().0 < 8 { 63 } else { 62 };
            assert_eq!(counter.count(), per_thread * 8);
        } else {
            assert_eq!(counter.count(), 1000);
        }
    }
}

/// A checkpointer reporting and resetting while writers run never sees
/// an out-of-order or below-threshold report.
#[test]
fn test_checkpoint_during_writes() {
    let journal = Arc::new(create_journal(5));
    let mut handles = vec![];

    for t in 0..4u64 {
        let journal_clone = Arc::clone(&journal);
        handles.push(thread::spawn(move || {
            for i in 0..2000u64 {
                journal_clone.record_block_access((i * 31 + t) % 257).unwrap();
            }
        }));
    }

    let checkpointer = {
        let journal_clone = Arc::clone(&journal);
        thread::spawn(move || {
            for _ in 0..50 {
                let report = journal_clone.hot_blocks();
                assert!(report.iter().all(|c| c.count() >= 5));
                assert!(report
                    .as_slice()
                    .windows(2)
                    .all(|w| w[0].block() < w[1].block()));
                journal_clone.reset_all_block_counts();
            }
        })
    };

    for h in handles {
        h.join().unwrap();
    }
    checkpointer.join().unwrap();

    // Every block ever written is still tracked
    let tracker = journal.tracker().unwrap();
    assert!(tracker.len() <= 257);
    assert!(!tracker.is_empty());
}

/// Shutdown only after every writer has let go of the journal.
#[test]
fn test_shutdown_after_writers_finish() {
    let mut journal = Arc::new(create_journal(1));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let journal_clone = Arc::clone(&journal);
            thread::spawn(move || {
                for i in 0..100u64 {
                    journal_clone.record_block_access(t * 100 + i).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    let journal = Arc::get_mut(&mut journal).unwrap();
    assert_eq!(journal.cleanup_hot_blocks(), 400);
    assert_eq!(journal.lifecycle(), Lifecycle::Destroyed);
    assert_eq!(
        journal.record_block_access(1),
        Err(Error::InvalidState {
            state: Lifecycle::Destroyed
        })
    );
    assert!(journal.hot_blocks().is_empty());
}

/// A journal whose tracker could not be created keeps working without it.
#[test]
fn test_journal_without_tracking() {
    let mut journal = Journal::new("loop1");
    let result = journal.init_hot_blocks(TrackerConfig::default().with_initial_capacity(usize::MAX));

    let err = result.unwrap_err();
    assert!(matches!(err, Error::OutOfMemory { .. }));
    assert!(!err.is_fatal());
    assert_eq!(journal.lifecycle(), Lifecycle::Uninitialized);

    assert!(journal.record_block_access(7).is_err());
    journal.print_hot_blocks();
    journal.reset_all_block_counts();
    assert_eq!(journal.cleanup_hot_blocks(), 0);
}

/// The checkpoint report goes through the log sink and leaves state alone.
#[test]
fn test_print_hot_blocks_at_checkpoint() {
    let journal = create_journal(2);
    for blocknr in [8u64, 8, 3, 3, 3, 5] {
        journal.record_block_access(blocknr).unwrap();
    }

    let output = capture_logs(|| journal.print_hot_blocks());
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected report:\n{output}");

    // Header names the device, then one line per hot block in block order
    assert!(lines[0].contains("Hot blocks in journal loop0-8:"));
    assert!(lines[0].contains("journal=loop0-8"));
    assert!(lines[1].contains("Block 3: 3 accesses"));
    assert!(lines[2].contains("Block 8: 2 accesses"));
    assert!(lines.iter().all(|line| line.contains("INFO")));
    assert!(!output.contains("Block 5:"));

    assert_eq!(journal.hot_blocks().to_pairs(), vec![(3, 3), (8, 2)]);
}

/// A journal without a tracker logs nothing at checkpoint.
#[test]
fn test_print_hot_blocks_without_tracker_is_silent() {
    let journal = Journal::new("loop2");
    let output = capture_logs(|| journal.print_hot_blocks());
    assert!(output.is_empty());
}
