//! Split and transfer errors.

use splitter_types::{Address, Amount};
use thiserror::Error;

use crate::plan::Payout;

/// A failure reported by the host ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("transfer rejected by ledger: {0}")]
    Rejected(String),

    #[error("insufficient pool balance: need {needed}, have {available}")]
    InsufficientFunds { needed: Amount, available: Amount },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SplitError {
    #[error("no recipients to split between")]
    NoRecipients,

    #[error("snapshot weights sum to {total_weight}, expected 100")]
    InvalidSnapshot { total_weight: u64 },

    #[error("could not read pool balance: {0}")]
    Balance(#[source] TransferError),

    #[error("pool balance {balance} is below the incoming payment {incoming}")]
    IncomingExceedsBalance { incoming: Amount, balance: Amount },

    #[error("transfer of {amount} to {recipient} failed, split aborted: {source}")]
    TransferFailed {
        recipient: Address,
        amount: Amount,
        #[source]
        source: TransferError,
    },

    #[error("transfer of {amount} to {recipient} failed and {} completed payouts could not be reversed: {source}", .unreconciled.len())]
    RollbackFailed {
        recipient: Address,
        amount: Amount,
        #[source]
        source: TransferError,
        unreconciled: Vec<Payout>,
    },
}
