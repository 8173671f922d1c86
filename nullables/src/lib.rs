//! Nullable infrastructure for deterministic testing.
//!
//! Everything the splitter needs from its host (the ledger holding the pool,
//! durable storage) is abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Keep all state in memory
//! - Can be told to fail on demand
//! - Record every call for assertions
//!
//! Usage: hand a nullable to the service wherever the real host goes.

pub mod ledger;
pub mod store;

pub use ledger::NullLedger;
pub use store::NullRegistryStore;
