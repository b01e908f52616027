use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::{PageWindow, StoreError, UploadFilter, UploadOrder, UploadStore};
use crate::{
    models::{SortBy, SortDirection, UploadRecord},
    utils::name_contains,
};

// Process-local record store, shared between clones
#[derive(Clone, Default)]
pub struct MemoryUploadStore {
    records: Arc<RwLock<Vec<UploadRecord>>>,
}

impl MemoryUploadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store preloaded from a JSON array of records.
    pub async fn from_seed_file(path: &str) -> Result<Self, StoreError> {
        let raw = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to read seed file {}: {}", path, e)))?;
        let records: Vec<UploadRecord> = serde_json::from_slice(&raw)
            .map_err(|e| StoreError::Unavailable(format!("Invalid seed file {}: {}", path, e)))?;

        info!("Loaded {} upload records from {}", records.len(), path);

        let store = Self::new();
        for record in records {
            store.insert(record).await;
        }
        Ok(store)
    }

    /// Adds a record. Used by seeding and fixtures; the service never writes.
    pub async fn insert(&self, record: UploadRecord) {
        self.records.write().await.push(record);
    }
}

fn matches(record: &UploadRecord, filter: &UploadFilter) -> bool {
    filter
        .name_contains
        .as_deref()
        .is_none_or(|needle| name_contains(&record.name, needle))
}

fn compare(a: &UploadRecord, b: &UploadRecord, order: &UploadOrder) -> Ordering {
    let primary = match order.sort_by {
        SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
    };
    let primary = match order.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    // id descending on ties, whatever the direction
    primary.then_with(|| b.id.cmp(&a.id))
}

#[async_trait]
impl UploadStore for MemoryUploadStore {
    async fn count(&self, filter: &UploadFilter) -> Result<u64, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| matches(r, filter)).count() as u64)
    }

    async fn fetch(
        &self,
        filter: &UploadFilter,
        order: &UploadOrder,
        window: PageWindow,
    ) -> Result<Vec<UploadRecord>, StoreError> {
        let records = self.records.read().await;

        let mut matching: Vec<&UploadRecord> =
            records.iter().filter(|r| matches(r, filter)).collect();
        matching.sort_by(|a, b| compare(a, b, order));

        let offset = usize::try_from(window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);

        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
