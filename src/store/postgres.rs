use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{PageWindow, StoreError, UploadFilter, UploadOrder, UploadStore};
use crate::{
    models::{SortBy, UploadRecord},
    utils::escape_like_pattern,
};

const SELECT_UPLOADS: &str = "SELECT id, name, remote_url, created_at FROM uploads";
const COUNT_UPLOADS: &str = "SELECT COUNT(*) FROM uploads";

// PostgreSQL record store
#[derive(Clone)]
pub struct PgUploadStore {
    pool: PgPool, // Shared connection pool
}

impl PgUploadStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn sort_column(sort_by: SortBy) -> &'static str {
    match sort_by {
        SortBy::CreatedAt => "created_at",
    }
}

/// Appends the `WHERE` clause for the name filter, if any.
fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &UploadFilter) {
    if let Some(needle) = &filter.name_contains {
        builder
            .push(" WHERE name ILIKE ")
            .push_bind(format!("%{}%", escape_like_pattern(needle)))
            .push(" ESCAPE '\\'");
    }
}

fn count_query(filter: &UploadFilter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(COUNT_UPLOADS);
    push_filter(&mut builder, filter);
    builder
}

fn fetch_query(
    filter: &UploadFilter,
    order: &UploadOrder,
    window: PageWindow,
) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(SELECT_UPLOADS);
    push_filter(&mut builder, filter);

    // Column and direction come from closed enums, never from input text
    builder
        .push(" ORDER BY ")
        .push(sort_column(order.sort_by))
        .push(" ")
        .push(order.direction.as_sql())
        .push(", id DESC");

    // Postgres takes BIGINT here; clamp windows past i64::MAX
    builder
        .push(" LIMIT ")
        .push_bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset).unwrap_or(i64::MAX));

    builder
}

#[async_trait]
impl UploadStore for PgUploadStore {
    async fn count(&self, filter: &UploadFilter) -> Result<u64, StoreError> {
        let total: i64 = count_query(filter)
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn fetch(
        &self,
        filter: &UploadFilter,
        order: &UploadOrder,
        window: PageWindow,
    ) -> Result<Vec<UploadRecord>, StoreError> {
        let uploads = fetch_query(filter, order, window)
            .build_query_as::<UploadRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(uploads)
    }
}
