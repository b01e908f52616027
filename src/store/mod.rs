// Submodules for the PostgreSQL and in-memory record stores
mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

pub use memory::MemoryUploadStore;
pub use postgres::PgUploadStore;

use crate::{
    config::Config,
    database::init_db,
    models::{ResolvedUploadQuery, SortBy, SortDirection, UploadRecord},
};

// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error), // Connection loss, failed statement, bad row

    #[error("Store unavailable: {0}")]
    Unavailable(String), // Store could not be reached or is misconfigured
}

/// Name filter applied to both the count and the page read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFilter {
    /// Case-insensitive substring of the record name. `None` matches all.
    pub name_contains: Option<String>,
}

/// Sort order. Ties are always broken by id descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadOrder {
    pub sort_by: SortBy,
    pub direction: SortDirection,
}

/// Offset/limit window of a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl From<&ResolvedUploadQuery> for UploadFilter {
    fn from(query: &ResolvedUploadQuery) -> Self {
        Self {
            name_contains: query.search_query.clone(),
        }
    }
}

impl From<&ResolvedUploadQuery> for UploadOrder {
    fn from(query: &ResolvedUploadQuery) -> Self {
        Self {
            sort_by: query.sort_by,
            direction: query.sort_direction,
        }
    }
}

impl From<&ResolvedUploadQuery> for PageWindow {
    fn from(query: &ResolvedUploadQuery) -> Self {
        Self {
            offset: query.offset(),
            limit: u64::from(query.page_size),
        }
    }
}

// Async record store trait
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Count every record matching the filter.
    async fn count(&self, filter: &UploadFilter) -> Result<u64, StoreError>;

    /// Fetch the records matching the filter, ordered and windowed.
    async fn fetch(
        &self,
        filter: &UploadFilter,
        order: &UploadOrder,
        window: PageWindow,
    ) -> Result<Vec<UploadRecord>, StoreError>;
}

// Enum to represent record store backends
#[derive(Clone)]
pub enum UploadStoreBackend {
    Postgres(PgUploadStore), // PostgreSQL via sqlx
    Memory(MemoryUploadStore), // Process-local records
}

// Delegates calls to the chosen backend
#[async_trait]
impl UploadStore for UploadStoreBackend {
    async fn count(&self, filter: &UploadFilter) -> Result<u64, StoreError> {
        match self {
            UploadStoreBackend::Postgres(s) => s.count(filter).await,
            UploadStoreBackend::Memory(s) => s.count(filter).await,
        }
    }

    async fn fetch(
        &self,
        filter: &UploadFilter,
        order: &UploadOrder,
        window: PageWindow,
    ) -> Result<Vec<UploadRecord>, StoreError> {
        match self {
            UploadStoreBackend::Postgres(s) => s.fetch(filter, order, window).await,
            UploadStoreBackend::Memory(s) => s.fetch(filter, order, window).await,
        }
    }
}

// Initialize the record store based on config
pub async fn init_store(config: &Config) -> Result<UploadStoreBackend, StoreError> {
    if config.use_memory_store {
        info!("Initializing in-memory upload store");
        let store = match &config.memory_seed_path {
            Some(path) => MemoryUploadStore::from_seed_file(path).await?,
            None => MemoryUploadStore::new(),
        };
        return Ok(UploadStoreBackend::Memory(store));
    }

    let database_url = config.database_url.as_deref().ok_or_else(|| {
        StoreError::Unavailable("DATABASE_URL is required unless USE_MEMORY_STORE is set".into())
    })?;

    info!("Initializing PostgreSQL upload store");
    let pool = init_db(database_url, config.db_max_connections).await?;
    Ok(UploadStoreBackend::Postgres(PgUploadStore::new(pool)))
}
