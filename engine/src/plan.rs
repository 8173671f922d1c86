//! Payout planning.

use serde::{Deserialize, Serialize};
use splitter_registry::RegistrySnapshot;
use splitter_types::{Address, Amount, ConditionId, Weight};

use crate::error::SplitError;

/// One recipient's computed share.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub condition: ConditionId,
    pub recipient: Address,
    pub amount: Amount,
}

/// Every payout of a split, fixed before any transfer is issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitPlan {
    /// Registry generation the plan was computed from.
    pub generation: u64,
    pub balance: Amount,
    /// One entry per live condition, in registry order, zero amounts included.
    pub payouts: Vec<Payout>,
    pub distributed: Amount,
    /// `balance - distributed`; always below the number of recipients.
    pub remainder: Amount,
}

impl SplitPlan {
    /// Payouts that result in a transfer (non-zero amounts).
    pub fn transfers(&self) -> impl Iterator<Item = &Payout> {
        self.payouts.iter().filter(|p| !p.amount.is_zero())
    }
}

/// Compute each recipient's share of `balance`.
pub fn plan_split(snapshot: &RegistrySnapshot, balance: Amount) -> Result<SplitPlan, SplitError> {
    if snapshot.is_empty() {
        return Err(SplitError::NoRecipients);
    }
    let total_weight = snapshot.total_weight();
    if total_weight != u64::from(Weight::TOTAL) {
        return Err(SplitError::InvalidSnapshot { total_weight });
    }

    let payouts: Vec<Payout> = snapshot
        .conditions()
        .iter()
        .map(|c| Payout {
            condition: c.id,
            recipient: c.recipient.clone(),
            amount: balance.share(c.weight),
        })
        .collect();

    // Weights sum to 100 so the shares sum to at most `balance`.
    let distributed: Amount = payouts.iter().map(|p| p.amount).sum();
    let remainder = balance.saturating_sub(distributed);

    Ok(SplitPlan {
        generation: snapshot.generation(),
        balance,
        payouts,
        distributed,
        remainder,
    })
}
