use thiserror::Error;

#[derive(Debug, Error)]
pub enum SplitterError {
    #[error("registry error: {0}")]
    Registry(#[from] splitter_registry::RegistryError),

    #[error("split error: {0}")]
    Split(#[from] splitter_engine::SplitError),

    #[error("store error: {0}")]
    Store(#[from] splitter_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] splitter_store_lmdb::LmdbError),

    #[error("config error: {0}")]
    Config(String),

    #[error("store already holds a deployed registry")]
    AlreadyDeployed,

    #[error("store holds no registry to restore")]
    NotDeployed,

    #[error("store integrity check failed: {0}")]
    Integrity(String),

    #[error("registry lock poisoned")]
    LockPoisoned,

    #[error("metrics error: {0}")]
    Metrics(String),
}
