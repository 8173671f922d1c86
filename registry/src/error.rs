//! Registry errors.

use splitter_types::{Address, ConditionId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("weights sum to {sum}, expected exactly 100")]
    InvalidWeightSum { sum: u64 },

    #[error("recipient set is empty")]
    EmptyRecipientSet,

    #[error("recipient {0} appears more than once")]
    DuplicateRecipient(Address),

    #[error("weight {weight} for recipient {recipient} is outside 1..=100")]
    InvalidWeight { recipient: Address, weight: u8 },

    #[error("{recipients} recipients given with {weights} weights")]
    LengthMismatch { recipients: usize, weights: usize },

    #[error("recipient {0} is not registered")]
    UnknownRecipient(Address),

    #[error("condition {0} does not exist")]
    UnknownConditionId(ConditionId),

    #[error("caller {caller} is not authorized for this operation")]
    Unauthorized { caller: Address },

    #[error("caller {caller} is not the owner")]
    NotOwner { caller: Address },

    #[error("condition id space exhausted")]
    IdExhausted,

    #[error("stored registry state is inconsistent: {0}")]
    CorruptState(String),
}
