//! Recipient-conditions ledger.
//!
//! A registry holds the live set of (recipient, weight) conditions of one
//! splitter deployment. Every committed state satisfies:
//! - weights sum to exactly 100
//! - no two live conditions share a recipient
//! - the recipient index and the id → condition map describe the same set
//!
//! Every mutation is validated in full before anything is written, so a
//! failed call leaves the registry exactly as it was.
//!
//! Administrative mutations are gated by a single transferable owner
//! ([`OwnershipGuard`]).

pub mod error;
pub mod ownership;
pub mod registry;
pub mod validation;

pub use error::RegistryError;
pub use ownership::OwnershipGuard;
pub use registry::{ConditionRegistry, RegistrySnapshot};
pub use validation::validate_conditions;
