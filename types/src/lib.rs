//! Fundamental types for the weighted payment splitter.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! recipient addresses, amounts in the smallest currency unit, percentage weights,
//! condition identifiers, and the persistable registry state.

pub mod address;
pub mod amount;
pub mod condition;
pub mod state;
pub mod weight;

pub use address::Address;
pub use amount::Amount;
pub use condition::{ConditionId, RecipientCondition};
pub use state::RegistryState;
pub use weight::Weight;
