//! A hosted splitter deployment.

use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard};

use splitter_engine::{CallContext, Ledger, SplitEngine, SplitError, SplitReport};
use splitter_registry::validation::zip_parallel;
use splitter_registry::{ConditionRegistry, RegistryError, RegistrySnapshot};
use splitter_store::RegistryStore;
use splitter_store_lmdb::{check_integrity, LmdbEnvironment};
use splitter_types::{Address, Amount, ConditionId, RecipientCondition, Weight};

use crate::config::SplitterConfig;
use crate::metrics::SplitterMetrics;
use crate::SplitterError;

pub type SharedStore = Arc<dyn RegistryStore + Send + Sync>;

/// Assembles a [`Splitter`] from its optional store and metrics.
#[derive(Default)]
pub struct SplitterBuilder {
    store: Option<SharedStore>,
    metrics: Option<Arc<SplitterMetrics>>,
}

impl SplitterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder wired up as `config` describes: an LMDB store when
    /// `persist` is set (checked for integrity before use) and metrics when
    /// `enable_metrics` is set.
    pub fn from_config(config: &SplitterConfig) -> Result<Self, SplitterError> {
        let mut builder = Self::new();
        if config.persist {
            let environment = LmdbEnvironment::open(&config.data_dir, config.lmdb_map_size)?;
            let report = check_integrity(environment.env())?;
            if !report.is_healthy() {
                return Err(SplitterError::Integrity(report.errors.join("; ")));
            }
            tracing::debug!(
                databases = report.databases_checked,
                entries = report.total_entries,
                "store integrity verified"
            );
            builder = builder.store(Arc::new(environment.registry_store()));
        }
        if config.enable_metrics {
            builder = builder.metrics(Arc::new(SplitterMetrics::new()));
        }
        Ok(builder)
    }

    pub fn store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn metrics(mut self, metrics: Arc<SplitterMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Deploy a new splitter owned by the deployer.
    ///
    /// Fails with [`SplitterError::AlreadyDeployed`] if the store already
    /// holds a registry. Nothing is persisted on failure.
    pub fn deploy(
        self,
        deployer: &impl CallContext,
        conditions: Vec<(Address, u8)>,
    ) -> Result<Splitter, SplitterError> {
        let registry = ConditionRegistry::initialize(deployer.caller().clone(), conditions)?;
        if let Some(store) = &self.store {
            if store.load_registry()?.is_some() {
                return Err(SplitterError::AlreadyDeployed);
            }
            store.save_registry(&registry.to_state())?;
        }
        tracing::info!(
            owner = %registry.owner(),
            recipients = registry.count(),
            "splitter deployed"
        );
        Ok(self.finish(registry))
    }

    /// Deploy from the two parallel arrays of recipients and weights.
    pub fn deploy_parallel(
        self,
        deployer: &impl CallContext,
        recipients: Vec<Address>,
        weights: Vec<u8>,
    ) -> Result<Splitter, SplitterError> {
        self.deploy(deployer, zip_parallel(recipients, weights)?)
    }

    /// Reopen the splitter held by the store.
    pub fn restore(self) -> Result<Splitter, SplitterError> {
        let store = self.store.as_ref().ok_or(SplitterError::NotDeployed)?;
        let state = store.load_registry()?.ok_or(SplitterError::NotDeployed)?;
        let registry = ConditionRegistry::restore(state)?;
        tracing::info!(
            owner = %registry.owner(),
            recipients = registry.count(),
            generation = registry.generation(),
            "splitter restored"
        );
        Ok(self.finish(registry))
    }

    fn finish(self, registry: ConditionRegistry) -> Splitter {
        if let Some(metrics) = &self.metrics {
            metrics.recipient_count.set(registry.count() as i64);
        }
        Splitter {
            registry: RwLock::new(registry),
            split_lock: Mutex::new(()),
            engine: SplitEngine::new(),
            store: self.store,
            metrics: self.metrics,
        }
    }
}

/// One splitter deployment.
///
/// Mutations hold the registry write lock and are applied to a copy that
/// replaces the live registry only once persisted. Splits hold the read
/// lock for their whole run and are serialized by `split_lock`, so reads
/// proceed alongside a split while mutations wait for it.
///
/// A [`Ledger`] passed to [`Splitter::pay_and_split`] must not call back
/// into the same splitter: with a mutation queued behind the split, a
/// nested read blocks forever.
pub struct Splitter {
    registry: RwLock<ConditionRegistry>,
    split_lock: Mutex<()>,
    engine: SplitEngine,
    store: Option<SharedStore>,
    metrics: Option<Arc<SplitterMetrics>>,
}

impl Splitter {
    pub fn builder() -> SplitterBuilder {
        SplitterBuilder::new()
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn get_weight(&self, recipient: &Address) -> Result<Weight, SplitterError> {
        Ok(self.read()?.get_weight(recipient)?)
    }

    pub fn is_recipient(&self, recipient: &Address) -> Result<bool, SplitterError> {
        Ok(self.read()?.is_recipient(recipient))
    }

    pub fn count(&self) -> Result<usize, SplitterError> {
        Ok(self.read()?.count())
    }

    pub fn owner(&self) -> Result<Address, SplitterError> {
        Ok(self.read()?.owner().clone())
    }

    pub fn condition_id_of(&self, recipient: &Address) -> Result<ConditionId, SplitterError> {
        Ok(self.read()?.condition_id_of(recipient)?)
    }

    pub fn condition(&self, id: ConditionId) -> Result<Option<RecipientCondition>, SplitterError> {
        Ok(self.read()?.condition(id).cloned())
    }

    pub fn generation(&self) -> Result<u64, SplitterError> {
        Ok(self.read()?.generation())
    }

    pub fn snapshot(&self) -> Result<RegistrySnapshot, SplitterError> {
        Ok(self.read()?.snapshot())
    }

    /// Fails with `NotOwner` unless `ctx` is the current owner.
    pub fn ensure_owner(&self, ctx: &impl CallContext) -> Result<(), SplitterError> {
        Ok(self.read()?.guard().ensure_owner(ctx.caller())?)
    }

    pub fn metrics(&self) -> Option<&SplitterMetrics> {
        self.metrics.as_deref()
    }

    // ── Mutations ───────────────────────────────────────────────────────

    pub fn update_recipient(
        &self,
        ctx: &impl CallContext,
        id: ConditionId,
        new_recipient: Address,
    ) -> Result<(), SplitterError> {
        self.mutate("update_recipient", ctx, |registry, caller| {
            registry.update_recipient(caller, id, new_recipient)
        })
    }

    pub fn update_recipient_address(
        &self,
        ctx: &impl CallContext,
        old_recipient: &Address,
        new_recipient: Address,
    ) -> Result<(), SplitterError> {
        self.mutate("update_recipient_address", ctx, |registry, caller| {
            registry.update_recipient_address(caller, old_recipient, new_recipient)
        })
    }

    pub fn update_recipient_conditions(
        &self,
        ctx: &impl CallContext,
        new_conditions: Vec<(Address, u8)>,
    ) -> Result<(), SplitterError> {
        self.mutate("update_recipient_conditions", ctx, |registry, caller| {
            registry.update_recipient_conditions(caller, new_conditions)
        })
    }

    pub fn transfer_ownership(
        &self,
        ctx: &impl CallContext,
        new_owner: Address,
    ) -> Result<(), SplitterError> {
        self.mutate("transfer_ownership", ctx, |registry, caller| {
            registry.transfer_ownership(caller, new_owner)
        })
    }

    /// Split the ledger's whole pooled balance, which already includes
    /// `incoming`, among the current recipients.
    pub fn pay_and_split<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        incoming: Amount,
    ) -> Result<SplitReport, SplitterError> {
        let _serial = self
            .split_lock
            .lock()
            .map_err(|_| SplitterError::LockPoisoned)?;
        let registry = self.read()?;
        let snapshot = registry.snapshot();

        let result = self.engine.pay_and_split(&snapshot, ledger, incoming);
        drop(registry);

        if let Some(metrics) = &self.metrics {
            match &result {
                Ok(report) => {
                    metrics.splits_total.inc();
                    metrics.transfers_total.inc_by(report.payouts.len() as u64);
                    metrics.split_remainder.observe(report.remainder.raw() as f64);
                }
                Err(_) => metrics.splits_failed_total.inc(),
            }
        }
        if let Err(SplitError::RollbackFailed { unreconciled, .. }) = &result {
            tracing::error!(
                unreconciled = unreconciled.len(),
                generation = snapshot.generation(),
                "split left payouts unreconciled"
            );
        }
        Ok(result?)
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn read(&self) -> Result<RwLockReadGuard<'_, ConditionRegistry>, SplitterError> {
        self.registry.read().map_err(|_| SplitterError::LockPoisoned)
    }

    fn mutate<F>(&self, op: &'static str, ctx: &impl CallContext, f: F) -> Result<(), SplitterError>
    where
        F: FnOnce(&mut ConditionRegistry, &Address) -> Result<(), RegistryError>,
    {
        let mut live = self
            .registry
            .write()
            .map_err(|_| SplitterError::LockPoisoned)?;
        let mut next = live.clone();

        if let Err(e) = f(&mut next, ctx.caller()) {
            tracing::warn!(op, caller = %ctx.caller(), error = %e, "mutation rejected");
            if let Some(metrics) = &self.metrics {
                metrics.mutations_rejected_total.inc();
            }
            return Err(e.into());
        }
        if next.generation() == live.generation() {
            return Ok(());
        }

        if let Some(store) = &self.store {
            store.save_registry(&next.to_state())?;
        }
        *live = next;

        if let Some(metrics) = &self.metrics {
            metrics.mutations_total.inc();
            metrics.recipient_count.set(live.count() as i64);
        }
        tracing::debug!(op, generation = live.generation(), "mutation committed");
        Ok(())
    }
}
