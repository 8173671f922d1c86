//! Single-owner access control.

use serde::{Deserialize, Serialize};
use splitter_types::Address;

use crate::error::RegistryError;

/// Holds the one identity allowed to perform administrative mutations.
///
/// There is always exactly one owner. A transfer replaces it in a single
/// assignment, so the previous owner has no rights once it returns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipGuard {
    owner: Address,
}

impl OwnershipGuard {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Guard check. Fails with [`RegistryError::NotOwner`].
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        if self.is_owner(caller) {
            Ok(())
        } else {
            Err(RegistryError::NotOwner {
                caller: caller.clone(),
            })
        }
    }

    /// Hand ownership to `new_owner`. Returns the previous owner.
    ///
    /// Fails with [`RegistryError::Unauthorized`] unless `caller` is the
    /// current owner; the guard is untouched on failure.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<Address, RegistryError> {
        if !self.is_owner(caller) {
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}
