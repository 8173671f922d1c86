//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::integrity::{check_data_dir, EXPECTED_DATABASES};
use crate::migration::Migrator;
use crate::registry::LmdbRegistryStore;
use crate::LmdbError;

/// Default LMDB map size (64 MiB). A registry is a few kilobytes.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

/// Wraps the LMDB environment and its database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) registry_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at `path`, then bring its schema
    /// up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        check_data_dir(path).map_err(LmdbError::DataDir)?;
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per directory by this
        // process and never memory-mapped elsewhere while open.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(EXPECTED_DATABASES.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let registry_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("registry"))?;
        let meta_db: Database<Bytes, Bytes> = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            registry_db,
            meta_db,
        };
        Migrator::run(&environment.registry_store())?;
        tracing::info!(path = %path.display(), "LMDB environment opened");
        Ok(environment)
    }

    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// Store handle for the registry held in this environment.
    pub fn registry_store(&self) -> LmdbRegistryStore {
        LmdbRegistryStore {
            env: Arc::clone(&self.env),
            registry_db: self.registry_db,
            meta_db: self.meta_db,
        }
    }
}
