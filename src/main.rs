mod models;
mod utils;
mod database;
mod config;
mod state;
mod store;
mod service;
mod handlers;
mod error;
#[cfg(test)]
mod test_support;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tracing::info;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{health_check, list_uploads},
    state::AppState,
    config::Config,
    service::UploadQueryService,
    store::init_store,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let store = init_store(&config).await?;

    let app_state = AppState {
        uploads: UploadQueryService::new(store),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

fn app(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/uploads", get(list_uploads))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
