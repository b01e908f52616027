use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default number of records returned per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Stored metadata for a previously ingested upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: Uuid,
    pub name: String,
    pub remote_url: String,
    pub created_at: DateTime<Utc>,
}

/// Field the listing is ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Listing request as received from a caller. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub search_query: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<SortBy>,
    pub sort_direction: Option<SortDirection>,
}

/// Fully populated query, produced by [`UploadQuery::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUploadQuery {
    /// `None` matches every record.
    pub search_query: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: SortBy,
    pub sort_direction: SortDirection,
}

impl UploadQuery {
    /// Apply defaults to every missing field.
    ///
    /// Empty search text means "no filter"; whitespace is a real pattern.
    /// A page or page size of zero is raised to one, so the resolved query
    /// is always valid.
    pub fn resolve(self) -> ResolvedUploadQuery {
        ResolvedUploadQuery {
            search_query: self.search_query.filter(|s| !s.is_empty()),
            page: self.page.unwrap_or(1).max(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1),
            sort_by: self.sort_by.unwrap_or_default(),
            sort_direction: self.sort_direction.unwrap_or_default(),
        }
    }
}

impl ResolvedUploadQuery {
    /// Number of records skipped before the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadQueryResult {
    pub uploads: Vec<UploadRecord>,
    pub total: u64,
}
