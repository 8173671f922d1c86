//! Abstract storage traits for splitter registries.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The service depends only on the traits.

pub mod codec;
pub mod error;
pub mod registry;

pub use codec::{decode_state, encode_state};
pub use error::StoreError;
pub use registry::RegistryStore;
