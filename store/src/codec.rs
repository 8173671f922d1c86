//! Checksummed encoding of registry state.
//!
//! Layout: 32-byte Blake2b-256 checksum of the payload, then the bincode
//! payload itself.

use splitter_types::RegistryState;

use crate::StoreError;

const CHECKSUM_LEN: usize = 32;

pub fn encode_state(state: &RegistryState) -> Result<Vec<u8>, StoreError> {
    let payload = state
        .to_bytes()
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    let mut out = Vec::with_capacity(CHECKSUM_LEN + payload.len());
    out.extend_from_slice(&RegistryState::checksum(&payload));
    out.extend_from_slice(&payload);
    Ok(out)
}

pub fn decode_state(bytes: &[u8]) -> Result<RegistryState, StoreError> {
    if bytes.len() < CHECKSUM_LEN {
        return Err(StoreError::Corruption(format!(
            "registry record is {} bytes, shorter than its checksum",
            bytes.len()
        )));
    }
    let (stored, payload) = bytes.split_at(CHECKSUM_LEN);
    if RegistryState::checksum(payload).as_slice() != stored {
        return Err(StoreError::Corruption(
            "registry checksum mismatch".to_string(),
        ));
    }
    RegistryState::from_bytes(payload).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitter_types::{Address, ConditionId, RecipientCondition, Weight};

    fn state() -> RegistryState {
        RegistryState {
            owner: Address::from("owner"),
            conditions: vec![
                RecipientCondition {
                    id: ConditionId::new(1),
                    recipient: Address::from("a"),
                    weight: Weight::new(60).unwrap(),
                },
                RecipientCondition {
                    id: ConditionId::new(2),
                    recipient: Address::from("b"),
                    weight: Weight::new(40).unwrap(),
                },
            ],
            next_id: ConditionId::new(3),
            generation: 4,
        }
    }

    #[test]
    fn decode_reverses_encode() {
        let bytes = encode_state(&state()).unwrap();
        assert_eq!(decode_state(&bytes).unwrap(), state());
    }

    #[test]
    fn flipped_payload_bit_is_corruption() {
        let mut bytes = encode_state(&state()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        assert!(matches!(decode_state(&bytes), Err(StoreError::Corruption(_))));
    }

    #[test]
    fn out_of_range_weight_fails_even_with_valid_checksum() {
        // Fixed-int bincode: owner (8 + 5), condition count (8), id (8),
        // recipient (8 + 1), then the first weight byte.
        const FIRST_WEIGHT: usize = 38;
        let mut payload = state().to_bytes().unwrap();
        assert_eq!(payload[FIRST_WEIGHT], 60);
        payload[FIRST_WEIGHT] = 0;

        let mut bytes = RegistryState::checksum(&payload).to_vec();
        bytes.extend_from_slice(&payload);
        assert!(matches!(
            decode_state(&bytes),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn truncated_record_is_corruption() {
        assert!(matches!(decode_state(&[0u8; 10]), Err(StoreError::Corruption(_))));
    }
}
