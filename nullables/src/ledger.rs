//! Nullable ledger — an in-memory pool with scripted failures.

use std::collections::{HashMap, HashSet};

use splitter_engine::{Ledger, TransferError};
use splitter_types::{Address, Amount};

/// An in-memory ledger holding one splitter's pool.
///
/// Transfers move funds from the pool to per-address balances. Specific
/// recipients can be made to reject transfers or reversals.
#[derive(Debug, Default)]
pub struct NullLedger {
    pool: Amount,
    balances: HashMap<Address, Amount>,
    transfers: Vec<(Address, Amount)>,
    reversals: Vec<(Address, Amount)>,
    reject_transfers: HashSet<Address>,
    reject_reversals: HashSet<Address>,
    unavailable: bool,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger whose pool already holds `amount`.
    pub fn with_pool(amount: Amount) -> Self {
        Self {
            pool: amount,
            ..Self::default()
        }
    }

    /// Credit an incoming payment to the pool.
    pub fn deposit(&mut self, amount: Amount) {
        self.pool = self.pool + amount;
    }

    pub fn pool(&self) -> Amount {
        self.pool
    }

    pub fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Amount::ZERO)
    }

    /// Successful transfers in the order they were issued.
    pub fn transfers(&self) -> &[(Address, Amount)] {
        &self.transfers
    }

    /// Successful reversals in the order they were issued.
    pub fn reversals(&self) -> &[(Address, Amount)] {
        &self.reversals
    }

    /// Make every transfer to `address` fail.
    pub fn reject_transfers_to(&mut self, address: Address) {
        self.reject_transfers.insert(address);
    }

    /// Make every reversal of a payment to `address` fail.
    pub fn reject_reversals_of(&mut self, address: Address) {
        self.reject_reversals.insert(address);
    }

    /// Make balance queries fail.
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    /// Clear the call logs (balances are kept).
    pub fn reset_log(&mut self) {
        self.transfers.clear();
        self.reversals.clear();
    }
}

impl Ledger for NullLedger {
    fn current_balance(&self) -> Result<Amount, TransferError> {
        if self.unavailable {
            return Err(TransferError::Unavailable("null ledger offline".to_string()));
        }
        Ok(self.pool)
    }

    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.reject_transfers.contains(to) {
            return Err(TransferError::Rejected(format!("{to} rejects payments")));
        }
        self.pool = self
            .pool
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                needed: amount,
                available: self.pool,
            })?;
        let balance = self.balances.entry(to.clone()).or_default();
        *balance = *balance + amount;
        self.transfers.push((to.clone(), amount));
        Ok(())
    }

    fn reverse(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError> {
        if self.reject_reversals.contains(to) {
            return Err(TransferError::Rejected(format!("{to} refuses reversal")));
        }
        let balance = self.balances.entry(to.clone()).or_default();
        *balance = balance
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientFunds {
                needed: amount,
                available: *balance,
            })?;
        self.pool = self.pool + amount;
        self.reversals.push((to.clone(), amount));
        Ok(())
    }
}
