//! LMDB implementation of RegistryStore.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use splitter_store::{decode_state, encode_state, RegistryStore, StoreError};
use splitter_types::RegistryState;

use crate::LmdbError;

const REGISTRY_KEY: &[u8] = b"registry";
const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

pub struct LmdbRegistryStore {
    pub(crate) env: Arc<Env>,
    pub(crate) registry_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl RegistryStore for LmdbRegistryStore {
    fn load_registry(&self) -> Result<Option<RegistryState>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bytes = self
            .registry_db
            .get(&rtxn, REGISTRY_KEY)
            .map_err(LmdbError::from)?;
        bytes.map(decode_state).transpose()
    }

    fn save_registry(&self, state: &RegistryState) -> Result<(), StoreError> {
        let bytes = encode_state(state)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.registry_db
            .put(&mut wtxn, REGISTRY_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        tracing::debug!(generation = state.generation, bytes = bytes.len(), "registry saved");
        Ok(())
    }

    fn clear_registry(&self) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.registry_db
            .delete(&mut wtxn, REGISTRY_KEY)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn schema_version(&self) -> Result<u32, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .meta_db
            .get(&rtxn, SCHEMA_VERSION_KEY)
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    StoreError::Corruption("schema_version has unexpected byte length".to_string())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        let bytes = version.to_le_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.meta_db
            .put(&mut wtxn, SCHEMA_VERSION_KEY, &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
    use crate::migration::CURRENT_SCHEMA_VERSION;
    use splitter_types::{Address, ConditionId, RecipientCondition, Weight};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(&dir.path().join("splitter"), DEFAULT_MAP_SIZE)
            .expect("open env");
        (dir, env)
    }

    fn state(generation: u64) -> RegistryState {
        RegistryState {
            owner: Address::from("owner"),
            conditions: vec![RecipientCondition {
                id: ConditionId::new(1),
                recipient: Address::from("solo"),
                weight: Weight::new(100).unwrap(),
            }],
            next_id: ConditionId::new(2),
            generation,
        }
    }

    #[test]
    fn fresh_store_is_empty_and_migrated() {
        let (_dir, env) = temp_env();
        let store = env.registry_store();
        assert!(store.load_registry().unwrap().is_none());
        assert_eq!(store.schema_version().unwrap(), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn save_then_load() {
        let (_dir, env) = temp_env();
        let store = env.registry_store();
        store.save_registry(&state(0)).unwrap();
        store.save_registry(&state(7)).unwrap();
        assert_eq!(store.load_registry().unwrap(), Some(state(7)));

        store.clear_registry().unwrap();
        assert!(store.load_registry().unwrap().is_none());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("splitter");
        {
            let env = LmdbEnvironment::open(&path, DEFAULT_MAP_SIZE).unwrap();
            env.registry_store().save_registry(&state(3)).unwrap();
        }
        let env = LmdbEnvironment::open(&path, DEFAULT_MAP_SIZE).unwrap();
        assert_eq!(env.registry_store().load_registry().unwrap(), Some(state(3)));
    }

    #[test]
    fn corrupted_record_is_detected() {
        let (_dir, env) = temp_env();
        let store = env.registry_store();
        store.save_registry(&state(1)).unwrap();

        let mut wtxn = env.env().write_txn().unwrap();
        env.registry_db
            .put(&mut wtxn, REGISTRY_KEY, &[0u8; 40])
            .unwrap();
        wtxn.commit().unwrap();

        assert!(matches!(store.load_registry(), Err(StoreError::Corruption(_))));
    }
}
