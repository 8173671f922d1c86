//! Validation of a proposed recipient set.

use std::collections::HashSet;

use splitter_types::{Address, Weight};

use crate::error::RegistryError;

/// Validate a full recipient set and convert raw weights.
///
/// Checks, in order: the set is non-empty, every weight is in `1..=100`,
/// no recipient repeats, and the weights sum to exactly 100. The sum uses
/// plain integer addition; 99 and 101 are both rejected.
pub fn validate_conditions(
    conditions: &[(Address, u8)],
) -> Result<Vec<(Address, Weight)>, RegistryError> {
    if conditions.is_empty() {
        return Err(RegistryError::EmptyRecipientSet);
    }

    let mut seen: HashSet<&Address> = HashSet::with_capacity(conditions.len());
    let mut validated = Vec::with_capacity(conditions.len());
    let mut sum: u64 = 0;

    for (recipient, raw) in conditions {
        let weight = Weight::new(*raw).ok_or_else(|| RegistryError::InvalidWeight {
            recipient: recipient.clone(),
            weight: *raw,
        })?;
        if !seen.insert(recipient) {
            return Err(RegistryError::DuplicateRecipient(recipient.clone()));
        }
        sum += u64::from(*raw);
        validated.push((recipient.clone(), weight));
    }

    if sum != u64::from(Weight::TOTAL) {
        return Err(RegistryError::InvalidWeightSum { sum });
    }
    Ok(validated)
}

/// Zip the two-array form into pairs.
pub fn zip_parallel(
    recipients: Vec<Address>,
    weights: Vec<u8>,
) -> Result<Vec<(Address, u8)>, RegistryError> {
    if recipients.len() != weights.len() {
        return Err(RegistryError::LengthMismatch {
            recipients: recipients.len(),
            weights: weights.len(),
        });
    }
    Ok(recipients.into_iter().zip(weights).collect())
}
