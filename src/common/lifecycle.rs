//! Tracker lifecycle states.

use std::fmt;

/// Where a journal's hot-block tracker is in its life.
///
/// ```text
/// Uninitialized ──init──▶ Active ──cleanup──▶ Destroyed
/// ```
///
/// Only `Active` accepts record/report/reset. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Uninitialized,
    Active,
    Destroyed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Active => "active",
            Lifecycle::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}
