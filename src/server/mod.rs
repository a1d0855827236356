pub mod handlers;
pub mod types;

use crate::{
    Result,
    config::Config,
    gradio::GradioClient,
    relay::{HttpImageFetcher, RelayService},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use handlers::AppState;

pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(handlers::TRYON_PATH, post(handlers::virtual_tryon))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The service does not start without a working inference connection.
    info!("Connecting to inference service...");
    let inference = GradioClient::connect(&config.upstream).await?;
    info!("Connected to inference service at {}", inference.root());

    let fetcher = HttpImageFetcher::new(&config.upstream)?;

    let relay = RelayService::new(
        Arc::new(inference),
        Arc::new(fetcher),
        config.prediction.clone(),
    );

    let app = router(
        AppState {
            relay: Arc::new(relay),
        },
        config.server.max_upload_bytes,
    );

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
