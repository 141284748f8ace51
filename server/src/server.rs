use crate::assets;
use crate::config::{HomePage, ServerConfig};
use crate::error::ServerError;
use crate::web::{self, AppState};
use axum::{routing::get, Router};
use std::path::Path;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Wire every route. Paths outside `/`, `/health`, `/api/info` and
/// `/static/` get a 404, `/favicon.ico` included.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    let routes = Router::new()
        .route("/", get(web::index))
        .route("/health", get(web::health))
        .route("/api/info", get(web::info));

    assets::mount(routes, static_dir)
        .fallback(web::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener for `config`. The port is not validated beforehand,
/// so a bad value shows up here.
pub async fn bind(config: &ServerConfig) -> Result<TcpListener, ServerError> {
    let addr = config.bind_addr();
    TcpListener::bind(addr.as_str())
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), ServerError> {
    axum::serve(listener, app).await?;
    Ok(())
}

pub async fn run(config: ServerConfig, started_at: Instant) -> Result<(), ServerError> {
    let listener = bind(&config).await?;

    let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
        addr: config.bind_addr(),
        source,
    })?;

    tracing::info!("Server starting on {}", local_addr);
    tracing::info!("Serving static files from: {}", config.static_dir.display());
    match &config.home_page {
        HomePage::Embedded => tracing::info!("Home page source: embedded"),
        HomePage::File(path) => tracing::info!("Home page source: {}", path.display()),
    }
    tracing::info!("Available endpoints:");
    tracing::info!("  GET / - Home page");
    tracing::info!("  GET /static/ - Static files");
    tracing::info!("  GET /health - Health check");
    tracing::info!("  GET /api/info - API info");

    let state = AppState::new(started_at, config.home_page.clone());
    serve(listener, router(state, &config.static_dir)).await
}
