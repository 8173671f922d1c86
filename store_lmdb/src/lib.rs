//! LMDB storage backend for splitter registries.
//!
//! Implements the `splitter-store` traits using the `heed` LMDB bindings.
//! One environment holds one splitter's registry; independent splitters use
//! independent directories.

pub mod environment;
pub mod error;
pub mod integrity;
pub mod migration;
pub mod registry;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use registry::LmdbRegistryStore;
