//! Error types for hot-block tracking.

use thiserror::Error;

use crate::common::{BlockNumber, Lifecycle};

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors from the tracker.
///
/// None of these are fatal to the owning journal. Hot-block tracking is a
/// diagnostic aid: on error the journal keeps running and tracking degrades
/// (undercounted blocks, or reports and resets becoming no-ops).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Operation on a tracker that is not active.
    #[error("hot-block tracker is {state}")]
    InvalidState { state: Lifecycle },

    /// An allocation failed.
    ///
    /// At construction the journal proceeds without tracking. On the record
    /// path the access event is dropped and not retried.
    #[error("out of memory while {context}")]
    OutOfMemory { context: &'static str },

    /// The index already holds an entry for this block.
    ///
    /// Unreachable under find-or-create with the tracker lock held.
    #[error("{0} is already tracked")]
    DuplicateKey(BlockNumber),
}

impl Error {
    /// Whether the error should stop journal operation. Always `false`.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        false
    }
}
