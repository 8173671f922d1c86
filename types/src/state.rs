//! Persistable registry state.
//!
//! This is the flat form written to storage. The recipient index is derived
//! and therefore not stored; it is rebuilt when the registry is restored.

use serde::{Deserialize, Serialize};

use crate::{Address, ConditionId, RecipientCondition};

/// Everything needed to reconstruct a registry after a restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Current owner.
    pub owner: Address,
    /// Live conditions in iteration order (ascending id).
    pub conditions: Vec<RecipientCondition>,
    /// The id the next created condition will receive.
    pub next_id: ConditionId,
    /// Number of committed mutations since initialisation.
    pub generation: u64,
}

impl RegistryState {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }

    /// Blake2b-256 checksum of an encoded state.
    pub fn checksum(encoded: &[u8]) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(encoded);
        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Weight;

    fn sample() -> RegistryState {
        RegistryState {
            owner: Address::from("owner"),
            conditions: vec![RecipientCondition {
                id: ConditionId::new(1),
                recipient: Address::from("alice"),
                weight: Weight::new(100).unwrap(),
            }],
            next_id: ConditionId::new(2),
            generation: 0,
        }
    }

    #[test]
    fn bincode_round_trip() {
        let state = sample();
        let bytes = state.to_bytes().unwrap();
        assert_eq!(RegistryState::from_bytes(&bytes).unwrap(), state);
    }

    #[test]
    fn checksum_detects_tampering() {
        let bytes = sample().to_bytes().unwrap();
        let sum = RegistryState::checksum(&bytes);
        let mut tampered = bytes.clone();
        let last = tampered.len() - 1;
        tampered[last] ^= 0xFF;
        assert_ne!(RegistryState::checksum(&tampered), sum);
        assert_eq!(RegistryState::checksum(&bytes), sum);
    }
}
