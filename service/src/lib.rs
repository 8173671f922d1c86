//! Splitter instance — hosts one weighted payment splitter deployment.
//!
//! A [`Splitter`] owns a condition registry behind a reader-writer lock:
//! - mutations are applied copy-on-write and persisted before they become
//!   visible, so readers never observe a half-applied change
//! - splits run on a snapshot while holding the registry read lock, so a
//!   mutation that arrives mid-split waits until the split completes
//! - splits are serialized among themselves
//!
//! Any number of independent splitters can coexist in one process.

pub mod config;
pub mod error;
pub mod metrics;
pub mod splitter;

pub use config::SplitterConfig;
pub use error::SplitterError;
pub use metrics::SplitterMetrics;
pub use splitter::{Splitter, SplitterBuilder};
