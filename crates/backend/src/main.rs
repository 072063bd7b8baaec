pub mod api;
pub mod routes;
pub mod shared;
pub mod system;
pub mod usecases;

use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;

    let service = usecases::u508_import_translations::HttpMetadataService::new(
        &config.metadata_service,
    )
    .map_err(|e| anyhow::anyhow!("metadata service init failed: {e}"))?;
    tracing::info!(
        "Metadata service endpoint: {}",
        config.metadata_service.endpoint()
    );

    let tracker = Arc::new(usecases::u508_import_translations::ProgressTracker::new());
    api::handlers::usecases::init_u508(Arc::new(
        usecases::u508_import_translations::ImportExecutor::new(
            Arc::new(service),
            tracker,
            config.import.batch_size,
            config.import.session_max_age_hours,
        ),
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = routes::configure_routes(config.import.max_request_bytes).layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid server address: {e}"))?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        "Translation import service listening on http://{} (batch size {})",
        addr,
        config.import.batch_size
    );

    axum::serve(listener, app).await?;
    Ok(())
}
