//! The condition registry — authoritative recipient → weight → id mapping.

use std::collections::{BTreeMap, HashMap, HashSet};

use splitter_types::{Address, ConditionId, RecipientCondition, RegistryState, Weight};

use crate::error::RegistryError;
use crate::ownership::OwnershipGuard;
use crate::validation::{validate_conditions, zip_parallel};

/// An immutable view of the live condition set at one generation.
///
/// The split engine only ever sees snapshots, never the registry itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrySnapshot {
    generation: u64,
    conditions: Vec<RecipientCondition>,
}

impl RegistrySnapshot {
    pub fn new(generation: u64, conditions: Vec<RecipientCondition>) -> Self {
        Self {
            generation,
            conditions,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Conditions in registry iteration order.
    pub fn conditions(&self) -> &[RecipientCondition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.conditions
            .iter()
            .map(|c| u64::from(c.weight.get()))
            .sum()
    }
}

/// Registry of the live recipient conditions of one splitter deployment.
///
/// Conditions are keyed by id in a `BTreeMap`. Ids are handed out in
/// increasing order and an address update keeps the id, so ascending-id
/// order is exactly insertion order. The recipient index gives O(1)
/// `is_recipient` / `get_weight`.
#[derive(Clone, Debug)]
pub struct ConditionRegistry {
    guard: OwnershipGuard,
    conditions: BTreeMap<ConditionId, RecipientCondition>,
    recipient_index: HashMap<Address, ConditionId>,
    next_id: ConditionId,
    generation: u64,
}

impl ConditionRegistry {
    /// Create a registry owned by `owner` with the given recipient set.
    ///
    /// Ids are assigned in sequence order starting at [`ConditionId::FIRST`].
    /// Nothing is created on failure.
    pub fn initialize(
        owner: Address,
        conditions: Vec<(Address, u8)>,
    ) -> Result<Self, RegistryError> {
        let validated = validate_conditions(&conditions)?;
        let mut registry = Self {
            guard: OwnershipGuard::new(owner),
            conditions: BTreeMap::new(),
            recipient_index: HashMap::new(),
            next_id: ConditionId::FIRST,
            generation: 0,
        };
        registry.install(validated)?;
        tracing::info!(
            owner = %registry.guard.owner(),
            count = registry.count(),
            "registry initialized"
        );
        Ok(registry)
    }

    /// Two-array form of [`ConditionRegistry::initialize`].
    pub fn from_parallel(
        owner: Address,
        recipients: Vec<Address>,
        weights: Vec<u8>,
    ) -> Result<Self, RegistryError> {
        Self::initialize(owner, zip_parallel(recipients, weights)?)
    }

    /// Rebuild a registry from persisted state, re-checking every invariant.
    pub fn restore(state: RegistryState) -> Result<Self, RegistryError> {
        let mut conditions = BTreeMap::new();
        let mut recipient_index = HashMap::new();
        for condition in state.conditions {
            if recipient_index
                .insert(condition.recipient.clone(), condition.id)
                .is_some()
            {
                return Err(RegistryError::CorruptState(format!(
                    "recipient {} stored twice",
                    condition.recipient
                )));
            }
            if conditions.insert(condition.id, condition).is_some() {
                return Err(RegistryError::CorruptState("condition id stored twice".into()));
            }
        }
        let registry = Self {
            guard: OwnershipGuard::new(state.owner),
            conditions,
            recipient_index,
            next_id: state.next_id,
            generation: state.generation,
        };
        registry.verify_invariants()?;
        Ok(registry)
    }

    /// The persistable form of this registry.
    pub fn to_state(&self) -> RegistryState {
        RegistryState {
            owner: self.guard.owner().clone(),
            conditions: self.conditions.values().cloned().collect(),
            next_id: self.next_id,
            generation: self.generation,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get_weight(&self, recipient: &Address) -> Result<Weight, RegistryError> {
        let id = self.condition_id_of(recipient)?;
        self.conditions
            .get(&id)
            .map(|c| c.weight)
            .ok_or_else(|| RegistryError::UnknownRecipient(recipient.clone()))
    }

    pub fn is_recipient(&self, recipient: &Address) -> bool {
        self.recipient_index.contains_key(recipient)
    }

    /// Number of live conditions.
    pub fn count(&self) -> usize {
        self.conditions.len()
    }

    pub fn condition_id_of(&self, recipient: &Address) -> Result<ConditionId, RegistryError> {
        self.recipient_index
            .get(recipient)
            .copied()
            .ok_or_else(|| RegistryError::UnknownRecipient(recipient.clone()))
    }

    pub fn condition(&self, id: ConditionId) -> Option<&RecipientCondition> {
        self.conditions.get(&id)
    }

    /// Live conditions in insertion order.
    pub fn conditions(&self) -> impl Iterator<Item = &RecipientCondition> {
        self.conditions.values()
    }

    pub fn owner(&self) -> &Address {
        self.guard.owner()
    }

    pub fn guard(&self) -> &OwnershipGuard {
        &self.guard
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy of the live set for the split engine.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::new(self.generation, self.conditions.values().cloned().collect())
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Point condition `id` at a new recipient, keeping its id and weight.
    ///
    /// Allowed for the owner and for the recipient currently holding `id`.
    /// Updating a recipient to its own address is a no-op.
    pub fn update_recipient(
        &mut self,
        caller: &Address,
        id: ConditionId,
        new_recipient: Address,
    ) -> Result<(), RegistryError> {
        let current = self
            .conditions
            .get(&id)
            .map(|c| c.recipient.clone())
            .ok_or(RegistryError::UnknownConditionId(id))?;

        if !self.guard.is_owner(caller) && current != *caller {
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
            });
        }

        match self.recipient_index.get(&new_recipient) {
            Some(existing) if *existing != id => {
                return Err(RegistryError::DuplicateRecipient(new_recipient));
            }
            Some(_) => return Ok(()),
            None => {}
        }

        if let Some(condition) = self.conditions.get_mut(&id) {
            condition.recipient = new_recipient.clone();
        }
        self.recipient_index.remove(&current);
        self.recipient_index.insert(new_recipient.clone(), id);
        self.generation += 1;

        tracing::info!(
            condition = %id,
            from = %current,
            to = %new_recipient,
            "recipient updated"
        );
        Ok(())
    }

    /// [`ConditionRegistry::update_recipient`] addressed by the current
    /// recipient instead of the condition id.
    pub fn update_recipient_address(
        &mut self,
        caller: &Address,
        old_recipient: &Address,
        new_recipient: Address,
    ) -> Result<(), RegistryError> {
        let id = self.condition_id_of(old_recipient)?;
        self.update_recipient(caller, id, new_recipient)
    }

    /// Replace the whole recipient set. Owner only.
    ///
    /// New conditions get fresh ids, even for addresses that were already
    /// recipients before the replacement.
    pub fn update_recipient_conditions(
        &mut self,
        caller: &Address,
        new_conditions: Vec<(Address, u8)>,
    ) -> Result<(), RegistryError> {
        self.require_owner(caller)?;
        let validated = validate_conditions(&new_conditions)?;
        self.install(validated)?;
        self.generation += 1;

        tracing::info!(
            count = self.count(),
            generation = self.generation,
            "recipient conditions replaced"
        );
        Ok(())
    }

    /// Hand the registry to a new owner. Owner only.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        let previous = self.guard.transfer_ownership(caller, new_owner)?;
        self.generation += 1;
        tracing::info!(from = %previous, to = %self.guard.owner(), "ownership transferred");
        Ok(())
    }

    /// Check every structural invariant of the live set.
    pub fn verify_invariants(&self) -> Result<(), RegistryError> {
        if self.conditions.is_empty() {
            return Err(RegistryError::CorruptState("no live conditions".into()));
        }
        let sum: u64 = self
            .conditions
            .values()
            .map(|c| u64::from(c.weight.get()))
            .sum();
        if sum != u64::from(Weight::TOTAL) {
            return Err(RegistryError::CorruptState(format!("weights sum to {sum}")));
        }
        if self.recipient_index.len() != self.conditions.len() {
            return Err(RegistryError::CorruptState(
                "recipient index size differs from condition count".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.conditions.len());
        for (id, condition) in &self.conditions {
            if *id < ConditionId::FIRST {
                return Err(RegistryError::CorruptState(format!(
                    "condition {id} is below the first id {}",
                    ConditionId::FIRST
                )));
            }
            if Weight::new(condition.weight.get()).is_none() {
                return Err(RegistryError::CorruptState(format!(
                    "condition {id} has weight {} outside 1..={}",
                    condition.weight.get(),
                    Weight::TOTAL
                )));
            }
            if condition.id != *id || *id >= self.next_id {
                return Err(RegistryError::CorruptState(format!(
                    "condition {id} is misfiled or not below next id {}",
                    self.next_id
                )));
            }
            if self.recipient_index.get(&condition.recipient) != Some(id) {
                return Err(RegistryError::CorruptState(format!(
                    "recipient {} not indexed to {id}",
                    condition.recipient
                )));
            }
            if !seen.insert(&condition.recipient) {
                return Err(RegistryError::CorruptState(format!(
                    "recipient {} stored twice",
                    condition.recipient
                )));
            }
        }
        Ok(())
    }

    fn require_owner(&self, caller: &Address) -> Result<(), RegistryError> {
        self.guard
            .ensure_owner(caller)
            .map_err(|_| RegistryError::Unauthorized {
                caller: caller.clone(),
            })
    }

    /// Swap in a validated recipient set with freshly allocated ids.
    ///
    /// Both maps are built aside and only assigned once every id has been
    /// allocated, so an exhausted id space leaves the registry untouched.
    fn install(&mut self, validated: Vec<(Address, Weight)>) -> Result<(), RegistryError> {
        let mut next_id = self.next_id;
        let mut conditions = BTreeMap::new();
        let mut recipient_index = HashMap::with_capacity(validated.len());
        for (recipient, weight) in validated {
            let id = next_id;
            next_id = next_id.next().ok_or(RegistryError::IdExhausted)?;
            recipient_index.insert(recipient.clone(), id);
            conditions.insert(
                id,
                RecipientCondition {
                    id,
                    recipient,
                    weight,
                },
            );
        }
        self.conditions = conditions;
        self.recipient_index = recipient_index;
        self.next_id = next_id;
        Ok(())
    }
}
