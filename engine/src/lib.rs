//! Split engine — divides a pooled balance among weighted recipients.
//!
//! `payout_i = floor(B × weight_i / 100)` where `B` is the full pooled
//! balance at the time of the split, not only the payment that triggered it.
//! Truncation leftovers stay in the pool.
//!
//! This crate handles:
//! - Pure payout planning from a registry snapshot ([`plan_split`])
//! - Issuing transfers through the host [`Ledger`], in registry order
//! - Reversing already-issued transfers when a later one fails

pub mod engine;
pub mod error;
pub mod ledger;
pub mod plan;

pub use engine::{SplitEngine, SplitReport};
pub use error::{SplitError, TransferError};
pub use ledger::{CallContext, Ledger};
pub use plan::{plan_split, Payout, SplitPlan};
