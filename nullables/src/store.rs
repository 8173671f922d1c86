//! Nullable store — thread-safe in-memory registry storage for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use splitter_store::{RegistryStore, StoreError};
use splitter_types::RegistryState;

/// An in-memory [`RegistryStore`].
/// Thread-safe so it can sit behind a shared splitter instance.
#[derive(Debug, Default)]
pub struct NullRegistryStore {
    state: Mutex<Option<RegistryState>>,
    schema_version: Mutex<u32>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl NullRegistryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`.
    pub fn with_state(state: RegistryState) -> Self {
        let store = Self::default();
        *store.state.lock().unwrap() = Some(state);
        store
    }

    /// Make every subsequent write fail with a backend error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// The currently stored state.
    pub fn stored(&self) -> Option<RegistryState> {
        self.state.lock().unwrap().clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Backend("null store write failure".to_string()))
        } else {
            Ok(())
        }
    }
}

impl RegistryStore for NullRegistryStore {
    fn load_registry(&self) -> Result<Option<RegistryState>, StoreError> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn save_registry(&self, state: &RegistryState) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.state.lock().unwrap() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn clear_registry(&self) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.state.lock().unwrap() = None;
        Ok(())
    }

    fn schema_version(&self) -> Result<u32, StoreError> {
        Ok(*self.schema_version.lock().unwrap())
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.check_writable()?;
        *self.schema_version.lock().unwrap() = version;
        Ok(())
    }
}
