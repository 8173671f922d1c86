//! Shared utilities for the weighted payment splitter.

pub mod logging;

pub use logging::{init_logging, try_init_logging, LogFormat};
