//! Split execution.

use serde::{Deserialize, Serialize};
use splitter_registry::RegistrySnapshot;
use splitter_types::Amount;

use crate::error::{SplitError, TransferError};
use crate::ledger::Ledger;
use crate::plan::{plan_split, Payout, SplitPlan};

/// Outcome of a completed split.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReport {
    /// Registry generation the payouts were computed from.
    pub generation: u64,
    pub incoming: Amount,
    /// Pooled balance the split was computed over (includes `incoming`).
    pub balance: Amount,
    /// Transfers issued, in registry order.
    pub payouts: Vec<Payout>,
    pub distributed: Amount,
    /// Truncation leftover kept in the pool.
    pub remainder: Amount,
}

/// Executes splits against a host [`Ledger`].
///
/// The engine holds no state. It plans every payout from the snapshot
/// before issuing the first transfer and never touches the registry, so
/// nothing a transfer does can change what the rest of the split pays.
///
/// Failure policy is abort-all: at the first failed transfer no further
/// transfers are issued and the completed ones are reversed, newest first.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplitEngine;

impl SplitEngine {
    pub fn new() -> Self {
        Self
    }

    /// Split the whole pooled balance among the snapshot's recipients.
    pub fn pay_and_split<L: Ledger + ?Sized>(
        &self,
        snapshot: &RegistrySnapshot,
        ledger: &mut L,
        incoming: Amount,
    ) -> Result<SplitReport, SplitError> {
        if snapshot.is_empty() {
            return Err(SplitError::NoRecipients);
        }
        let balance = ledger.current_balance().map_err(SplitError::Balance)?;
        if balance < incoming {
            return Err(SplitError::IncomingExceedsBalance { incoming, balance });
        }

        let plan = plan_split(snapshot, balance)?;
        let payouts = self.execute(&plan, ledger)?;

        tracing::info!(
            generation = plan.generation,
            incoming = %incoming,
            balance = %plan.balance,
            distributed = %plan.distributed,
            remainder = %plan.remainder,
            transfers = payouts.len(),
            "split completed"
        );

        Ok(SplitReport {
            generation: plan.generation,
            incoming,
            balance: plan.balance,
            payouts,
            distributed: plan.distributed,
            remainder: plan.remainder,
        })
    }

    fn execute<L: Ledger + ?Sized>(
        &self,
        plan: &SplitPlan,
        ledger: &mut L,
    ) -> Result<Vec<Payout>, SplitError> {
        let mut completed: Vec<Payout> = Vec::with_capacity(plan.payouts.len());
        for payout in plan.transfers() {
            match ledger.transfer(&payout.recipient, payout.amount) {
                Ok(()) => {
                    tracing::debug!(
                        condition = %payout.condition,
                        recipient = %payout.recipient,
                        amount = %payout.amount,
                        "transfer issued"
                    );
                    completed.push(payout.clone());
                }
                Err(source) => {
                    tracing::warn!(
                        recipient = %payout.recipient,
                        amount = %payout.amount,
                        error = %source,
                        completed = completed.len(),
                        "transfer failed, aborting split"
                    );
                    let unreconciled = self.roll_back(ledger, &completed);
                    return Err(if unreconciled.is_empty() {
                        SplitError::TransferFailed {
                            recipient: payout.recipient.clone(),
                            amount: payout.amount,
                            source,
                        }
                    } else {
                        SplitError::RollbackFailed {
                            recipient: payout.recipient.clone(),
                            amount: payout.amount,
                            source,
                            unreconciled,
                        }
                    });
                }
            }
        }
        Ok(completed)
    }

    /// Reverse completed payouts newest first. Returns the ones that could
    /// not be reversed; every reversal is attempted even after one fails.
    fn roll_back<L: Ledger + ?Sized>(&self, ledger: &mut L, completed: &[Payout]) -> Vec<Payout> {
        let mut unreconciled = Vec::new();
        for payout in completed.iter().rev() {
            if let Err(e) = ledger.reverse(&payout.recipient, payout.amount) {
                log_reversal_failure(payout, &e);
                unreconciled.push(payout.clone());
            }
        }
        unreconciled
    }
}

fn log_reversal_failure(payout: &Payout, error: &TransferError) {
    tracing::error!(
        recipient = %payout.recipient,
        amount = %payout.amount,
        error = %error,
        "could not reverse transfer, payout left unreconciled"
    );
}
