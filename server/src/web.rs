use crate::config::HomePage;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use shared::{HealthPayload, InfoPayload};
use std::io::ErrorKind;
use std::time::Instant;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
pub struct AppState {
    /// Captured once at process start, never written again
    pub started_at: Instant,
    pub home_page: HomePage,
}

impl AppState {
    pub fn new(started_at: Instant, home_page: HomePage) -> Self {
        Self {
            started_at,
            home_page,
        }
    }
}

/// Serve the home page, embedded or from disk
pub async fn index(State(state): State<AppState>) -> Response {
    let path = match &state.home_page {
        HomePage::Embedded => return Html(INDEX_HTML).into_response(),
        HomePage::File(path) => path,
    };

    match tokio::fs::read(path).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            tracing::warn!("Cannot read home page {}: {}", path.display(), e);
            let status = match e.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            status.into_response()
        }
    }
}

/// Liveness check with uptime
#[axum::debug_handler]
pub async fn health(State(state): State<AppState>) -> Json<HealthPayload> {
    Json(HealthPayload::new(state.started_at.elapsed()))
}

/// Instance metadata
pub async fn info() -> Json<InfoPayload> {
    Json(InfoPayload::new(resolve_hostname()))
}

/// Anything that no route claims
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "not found")
}

// Lookup failures never fail the request
fn resolve_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.into_string().unwrap_or_else(|raw| {
            tracing::debug!("Hostname is not valid UTF-8: {:?}", raw);
            String::new()
        }),
        Err(e) => {
            tracing::debug!("Hostname lookup failed: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    fn state(home_page: HomePage) -> AppState {
        AppState::new(Instant::now(), home_page)
    }

    #[tokio::test]
    async fn test_health_reports_healthy() {
        let Json(payload) = health(State(state(HomePage::Embedded))).await;

        assert_eq!(payload.status, "healthy");
        assert!(payload.uptime.ends_with('s'));
    }

    #[tokio::test]
    async fn test_info_reports_fixed_version() {
        let Json(payload) = info().await;

        assert_eq!(payload.version, "1.0.0");
        assert_eq!(payload.message, shared::INFO_MESSAGE);
    }

    #[tokio::test]
    async fn test_embedded_index() {
        let response = index(State(state(HomePage::Embedded))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, INDEX_HTML.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_home_file_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let home = HomePage::File(dir.path().join("missing.html"));

        let response = index(State(state(home))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_index_has_title() {
        assert!(INDEX_HTML.contains("<title>Beacon</title>"));
    }
}
