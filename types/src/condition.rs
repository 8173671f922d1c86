//! Recipient conditions: a weighted recipient with a stable identifier.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Address, Weight};

/// Stable identifier of a condition.
///
/// Assigned monotonically starting at [`ConditionId::FIRST`] and never reused
/// within a registry, even across full replacement of the recipient set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConditionId(u64);

impl ConditionId {
    pub const FIRST: Self = Self(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for ConditionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live (recipient, weight) pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientCondition {
    pub id: ConditionId,
    pub recipient: Address,
    pub weight: Weight,
}
