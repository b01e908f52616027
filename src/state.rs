use crate::service::UploadQueryService;
use crate::store::UploadStoreBackend;

/// Central application state shared across all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload listing over the configured record store.
    pub uploads: UploadQueryService<UploadStoreBackend>,
}
