//! Capabilities supplied by the host.
//!
//! The engine never moves funds itself. Everything that touches the real
//! ledger goes through these traits, so a host can back them with a chain
//! client, a database, or an in-memory double.

use splitter_types::{Address, Amount};

use crate::error::TransferError;

/// Funds held by one splitter deployment.
pub trait Ledger {
    /// The full pooled balance, including the payment being split.
    fn current_balance(&self) -> Result<Amount, TransferError>;

    /// Send `amount` from the pool to `to`. Not retried by the engine.
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError>;

    /// Undo a transfer completed earlier in the same split, returning
    /// `amount` from `to` to the pool.
    fn reverse(&mut self, to: &Address, amount: Amount) -> Result<(), TransferError>;
}

/// Identity of whoever invoked the current operation.
pub trait CallContext {
    fn caller(&self) -> &Address;
}

impl CallContext for Address {
    fn caller(&self) -> &Address {
        self
    }
}
