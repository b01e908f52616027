use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::UploadRecord;

/// Builder for upload fixtures with random, unique defaults.
pub struct UploadBuilder {
    record: UploadRecord,
}

pub fn make_upload() -> UploadBuilder {
    let id = Uuid::now_v7();
    let name = format!("{}.jpg", Uuid::new_v4());
    UploadBuilder {
        record: UploadRecord {
            id,
            remote_url: format!("https://storage.example.com/{}", name),
            name,
            created_at: Utc::now(),
        },
    }
}

impl UploadBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.record.created_at = created_at;
        self
    }

    pub fn build(self) -> UploadRecord {
        self.record
    }
}
