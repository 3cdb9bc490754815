//! Entry allocation strategies for the record path.
//!
//! Tracker setup reserves its initial slots with an ordinary (possibly
//! blocking) allocation. After that, new entries are made room for through an
//! [`EntryAllocator`], which is called with the tracker lock held and possibly
//! from a caller that must not sleep. An allocator therefore has to fail fast
//! with [`Error::OutOfMemory`] rather than wait for memory or abort.

use crate::common::{Error, Result};

/// Makes room for new index entries without blocking.
pub trait EntryAllocator: Send + Sync {
    /// Ensure `slots` can take `additional` more elements without
    /// reallocating on push.
    ///
    /// # Errors
    /// `Error::OutOfMemory` if the room cannot be made. `slots` is left
    /// unchanged in that case.
    fn try_reserve<T>(&self, slots: &mut Vec<T>, additional: usize) -> Result<()>;
}

#[inline]
fn has_spare<T>(slots: &Vec<T>, additional: usize) -> bool {
    slots.capacity() - slots.len() >= additional
}

/// Default allocator: grows the index with `Vec::try_reserve`.
///
/// Allocation failure is reported instead of aborting the process. Growing
/// goes through the global allocator and copies the whole arena with the
/// tracker lock held, so this is not safe where the caller must not sleep.
/// Use [`PreReservedAlloc`] there.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicAlloc;

impl EntryAllocator for AtomicAlloc {
    fn try_reserve<T>(&self, slots: &mut Vec<T>, additional: usize) -> Result<()> {
        if has_spare(slots, additional) {
            return Ok(());
        }
        slots
            .try_reserve(additional)
            .map_err(|_| Error::OutOfMemory {
                context: "inserting a block counter",
            })
    }
}

/// Never allocates on the record path.
///
/// Only the capacity reserved when the tracker was created is available.
/// Once it is used up, first accesses to new blocks are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreReservedAlloc;

impl EntryAllocator for PreReservedAlloc {
    fn try_reserve<T>(&self, slots: &mut Vec<T>, additional: usize) -> Result<()> {
        if has_spare(slots, additional) {
            Ok(())
        } else {
            Err(Error::OutOfMemory {
                context: "taking an entry from the pre-reserved pool",
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_alloc_grows() {
        let mut slots: Vec<u64> = Vec::new();
        AtomicAlloc.try_reserve(&mut slots, 1).unwrap();
        assert!(slots.capacity() >= 1);
    }

    #[test]
    fn test_atomic_alloc_reports_overflow() {
        let mut slots: Vec<u64> = vec![0];
        let result = AtomicAlloc.try_reserve(&mut slots, usize::MAX);
        assert!(matches!(result, Err(Error::OutOfMemory { .. })));
        assert_eq!(slots.len(), 1);
    }

    #[test]
    fn test_pre_reserved_uses_spare_capacity_only() {
        let mut slots: Vec<u64> = Vec::with_capacity(2);
        let capacity = slots.capacity();
        assert!(PreReservedAlloc.try_reserve(&mut slots, 1).is_ok());
        while slots.len() < capacity {
            slots.push(0);
        }

        let result = PreReservedAlloc.try_reserve(&mut slots, 1);
        assert!(matches!(result, Err(Error::OutOfMemory { .. })));
        assert_eq!(slots.capacity(), capacity);
    }
}
