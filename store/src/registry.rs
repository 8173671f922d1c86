//! Registry storage trait.

use crate::StoreError;
use splitter_types::RegistryState;

/// Durable home of one splitter's registry.
///
/// Implementations must write a state atomically: a reader sees either the
/// previous state or the new one, never a mix.
pub trait RegistryStore {
    /// Load the stored state, or `None` for a fresh store.
    fn load_registry(&self) -> Result<Option<RegistryState>, StoreError>;

    /// Replace the stored state.
    fn save_registry(&self, state: &RegistryState) -> Result<(), StoreError>;

    /// Remove the stored state.
    fn clear_registry(&self) -> Result<(), StoreError>;

    /// Schema version of the stored data (0 for a fresh store).
    fn schema_version(&self) -> Result<u32, StoreError>;

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
