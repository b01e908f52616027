use crate::{
    error::QueryError,
    models::{UploadQuery, UploadQueryResult},
    store::{PageWindow, UploadFilter, UploadOrder, UploadStore},
};

/// Lists stored uploads with search, pagination and sorting.
///
/// Read-only: the service never writes to the store. The count and the page
/// are two separate reads, so concurrent ingestion may make them disagree.
#[derive(Clone)]
pub struct UploadQueryService<S> {
    store: S,
}

impl<S: UploadStore> UploadQueryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self), fields(operation = "list_uploads"))]
    pub async fn list_uploads(&self, query: UploadQuery) -> Result<UploadQueryResult, QueryError> {
        let query = query.resolve();

        let filter = UploadFilter::from(&query);
        let order = UploadOrder::from(&query);
        let window = PageWindow::from(&query);

        let total = self.store.count(&filter).await?;
        let uploads = self.store.fetch(&filter, &order, window).await?;

        Ok(UploadQueryResult { uploads, total })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{
        models::{SortBy, SortDirection, UploadRecord},
        store::{MemoryUploadStore, StoreError},
        test_support::make_upload,
    };

    fn ids(result: &UploadQueryResult) -> Vec<Uuid> {
        result.uploads.iter().map(|u| u.id).collect()
    }

    fn search(pattern: &str) -> UploadQuery {
        UploadQuery {
            search_query: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    /// Five `{pattern}.jpg` records, created 0..4 days ago in that order.
    async fn seed_days_apart(store: &MemoryUploadStore, pattern: &str) -> Vec<UploadRecord> {
        let now = Utc::now();
        let mut uploads = Vec::new();
        for days in 0..5 {
            let upload = make_upload()
                .name(format!("{}.jpg", pattern))
                .created_at(now - Duration::days(days))
                .build();
            store.insert(upload.clone()).await;
            uploads.push(upload);
        }
        uploads
    }

    /// Five records created one after another, newest last.
    async fn seed_in_sequence(store: &MemoryUploadStore, pattern: &str) -> Vec<UploadRecord> {
        let now = Utc::now();
        let mut uploads = Vec::new();
        for seconds in 0..5 {
            let upload = make_upload()
                .name(format!("{}.jpg", pattern))
                .created_at(now + Duration::seconds(seconds))
                .build();
            store.insert(upload.clone()).await;
            uploads.push(upload);
        }
        uploads
    }

    #[tokio::test]
    async fn lists_matching_uploads_newest_first() {
        let store = MemoryUploadStore::new();
        let pattern = Uuid::new_v4().to_string();
        let uploads = seed_in_sequence(&store, &pattern).await;
        store.insert(make_upload().name("unrelated.png").build()).await;

        let service = UploadQueryService::new(store);
        let result = service.list_uploads(search(&pattern)).await.unwrap();

        assert_eq!(result.total, 5);
        let expected: Vec<_> = uploads.iter().rev().map(|u| u.id).collect();
        assert_eq!(ids(&result), expected);
    }

    #[tokio::test]
    async fn paginates_uploads() {
        let store = MemoryUploadStore::new();
        let pattern = Uuid::new_v4().to_string();
        let uploads = seed_in_sequence(&store, &pattern).await;
        let service = UploadQueryService::new(store);

        let first = service
            .list_uploads(UploadQuery {
                page: Some(1),
                page_size: Some(3),
                ..search(&pattern)
            })
            .await
            .unwrap();

        assert_eq!(first.total, 5);
        assert_eq!(ids(&first), vec![uploads[4].id, uploads[3].id, uploads[2].id]);

        let second = service
            .list_uploads(UploadQuery {
                page: Some(2),
                page_size: Some(3),
                ..search(&pattern)
            })
            .await
            .unwrap();

        assert_eq!(second.total, 5);
        assert_eq!(ids(&second), vec![uploads[1].id, uploads[0].id]);
    }

    #[tokio::test]
    async fn sorts_uploads_in_both_directions() {
        let store = MemoryUploadStore::new();
        let pattern = Uuid::new_v4().to_string();
        let uploads = seed_days_apart(&store, &pattern).await;
        let service = UploadQueryService::new(store);

        let desc = service
            .list_uploads(UploadQuery {
                sort_by: Some(SortBy::CreatedAt),
                sort_direction: Some(SortDirection::Desc),
                ..search(&pattern)
            })
            .await
            .unwrap();

        assert_eq!(desc.total, 5);
        let newest_first: Vec<_> = uploads.iter().map(|u| u.id).collect();
        assert_eq!(ids(&desc), newest_first);

        let asc = service
            .list_uploads(UploadQuery {
                sort_by: Some(SortBy::CreatedAt),
                sort_direction: Some(SortDirection::Asc),
                ..search(&pattern)
            })
            .await
            .unwrap();

        assert_eq!(asc.total, 5);
        let oldest_first: Vec<_> = newest_first.iter().rev().copied().collect();
        assert_eq!(ids(&asc), oldest_first);
    }

    #[tokio::test]
    async fn pages_concatenate_to_the_full_listing() {
        let store = MemoryUploadStore::new();
        let pattern = Uuid::new_v4().to_string();
        let now = Utc::now();
        // Shared timestamps force the id tie-break
        for i in 0..11 {
            let upload = make_upload()
                .name(format!("{}-{}.jpg", pattern, i))
                .created_at(now - Duration::hours(i / 3))
                .build();
            store.insert(upload).await;
        }
        let service = UploadQueryService::new(store);

        let full = service
            .list_uploads(UploadQuery {
                page_size: Some(11),
                ..search(&pattern)
            })
            .await
            .unwrap();

        let mut concatenated = Vec::new();
        for page in 1..=4 {
            let result = service
                .list_uploads(UploadQuery {
                    page: Some(page),
                    page_size: Some(3),
                    ..search(&pattern)
                })
                .await
                .unwrap();
            assert_eq!(result.total, 11);
            assert!(result.uploads.len() <= 3);
            concatenated.extend(ids(&result));
        }

        assert_eq!(concatenated, ids(&full));
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_but_keeps_total() {
        let store = MemoryUploadStore::new();
        let pattern = Uuid::new_v4().to_string();
        seed_days_apart(&store, &pattern).await;
        let service = UploadQueryService::new(store);

        let result = service
            .list_uploads(UploadQuery {
                page: Some(10),
                page_size: Some(3),
                ..search(&pattern)
            })
            .await
            .unwrap();

        assert!(result.uploads.is_empty());
        assert_eq!(result.total, 5);
    }

    #[tokio::test]
    async fn empty_search_matches_everything_with_default_page_size() {
        let store = MemoryUploadStore::new();
        let now = Utc::now();
        for minutes in 0..25 {
            store
                .insert(make_upload().created_at(now - Duration::minutes(minutes)).build())
                .await;
        }
        let service = UploadQueryService::new(store);

        let result = service.list_uploads(search("")).await.unwrap();

        assert_eq!(result.total, 25);
        assert_eq!(result.uploads.len(), 20);
    }

    #[tokio::test]
    async fn whitespace_search_filters_by_space() {
        let store = MemoryUploadStore::new();
        let spaced = make_upload().name("my photo.jpg").build();
        store.insert(spaced.clone()).await;
        store.insert(make_upload().name("report.pdf").build()).await;
        let service = UploadQueryService::new(store);

        let result = service.list_uploads(search(" ")).await.unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(ids(&result), vec![spaced.id]);
    }

    #[tokio::test]
    async fn repeated_calls_return_equal_results() {
        let store = MemoryUploadStore::new();
        let pattern = Uuid::new_v4().to_string();
        seed_days_apart(&store, &pattern).await;
        let service = UploadQueryService::new(store);

        let query = UploadQuery {
            page: Some(1),
            page_size: Some(2),
            ..search(&pattern)
        };
        let first = service.list_uploads(query.clone()).await.unwrap();
        let second = service.list_uploads(query).await.unwrap();

        assert_eq!(first, second);
    }

    struct FailingStore;

    #[async_trait]
    impl UploadStore for FailingStore {
        async fn count(&self, _filter: &UploadFilter) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }

        async fn fetch(
            &self,
            _filter: &UploadFilter,
            _order: &UploadOrder,
            _window: PageWindow,
        ) -> Result<Vec<UploadRecord>, StoreError> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_failure_is_surfaced_not_swallowed() {
        let service = UploadQueryService::new(FailingStore);

        let result = service.list_uploads(UploadQuery::default()).await;

        assert!(matches!(
            result,
            Err(QueryError::StoreAccessFailure(StoreError::Unavailable(_)))
        ));
    }
}
