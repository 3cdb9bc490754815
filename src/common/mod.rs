//! Common types shared across the crate.
//!
//! - Configuration constants and [`TrackerConfig`]
//! - Error types
//! - Identifiers ([`BlockNumber`]) and the tracker [`Lifecycle`]

pub mod config;
pub mod error;
mod block_number;
mod lifecycle;

pub use block_number::BlockNumber;
pub use config::TrackerConfig;
pub use error::{Error, Result};
pub use lifecycle::Lifecycle;
