//! HTTP routes.
//!
//! - `GET /`         front-end `index.html`
//! - `GET /static/*` front-end assets
//! - `GET /status`   current activity record (auto-idle applied)
//! - `GET /health`   liveness probe

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Local;
use serde::Serialize;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::error;

use office_core::state::types::format_timestamp;
use office_core::StateStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    store: Arc<StateStore>,
    frontend_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: StateStore, frontend_dir: PathBuf) -> Self {
        Self {
            store: Arc::new(store),
            frontend_dir: Arc::new(frontend_dir),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

pub fn router(state: AppState) -> Router {
    let index = ServeFile::new(state.frontend_dir.join("index.html"));
    let assets = ServeDir::new(state.frontend_dir.as_path());

    Router::new()
        .route_service("/", index)
        .nest_service("/static", assets)
        .route("/status", get(get_status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn get_status(State(state): State<AppState>) -> Response {
    let store = Arc::clone(&state.store);
    // Store I/O is blocking and may include the auto-idle write-back.
    match tokio::task::spawn_blocking(move || store.read_current_state()).await {
        Ok(record) => ([(header::CACHE_CONTROL, "no-store")], Json(record)).into_response(),
        Err(err) => {
            error!(error = %err, "State read task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("Failed to read state: {}", err) })),
            )
                .into_response()
        }
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: format_timestamp(Local::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{DateTime, TimeDelta};
    use fs_err as fs;
    use office_core::{ActivityState, StateUpdate};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct Fixture {
        _temp: TempDir,
        state_file: PathBuf,
        frontend_dir: PathBuf,
        store: StateStore,
    }

    fn fixture() -> Fixture {
        let temp = TempDir::new().expect("temp dir");
        let state_file = temp.path().join("state.json");
        let frontend_dir = temp.path().join("frontend");
        let store = StateStore::open(&state_file).expect("open store");
        Fixture {
            _temp: temp,
            state_file,
            frontend_dir,
            store,
        }
    }

    impl Fixture {
        fn app(&self) -> Router {
            router(AppState::new(self.store.clone(), self.frontend_dir.clone()))
        }
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).expect("JSON body"))
    }

    #[tokio::test]
    async fn status_returns_current_record() {
        let fx = fixture();
        fx.store
            .write_state(
                StateUpdate::new(ActivityState::Researching, "checking sources")
                    .with_progress(Some(30)),
            )
            .unwrap();

        let (status, body) = get_json(fx.app(), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "researching");
        assert_eq!(body["detail"], "checking sources");
        assert_eq!(body["progress"], 30);
        assert!(body["updated_at"].is_string());
    }

    #[tokio::test]
    async fn status_applies_auto_idle_and_persists_it() {
        let fx = fixture();
        let stale = format_timestamp(Local::now() - TimeDelta::seconds(60));
        fs::write(
            &fx.state_file,
            json!({
                "state": "executing",
                "detail": "deploy",
                "progress": 80,
                "updated_at": stale,
                "ttl_seconds": 25
            })
            .to_string(),
        )
        .unwrap();

        let (status, body) = get_json(fx.app(), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");
        assert_eq!(body["progress"], 0);

        let on_disk: Value =
            serde_json::from_str(&fs::read_to_string(&fx.state_file).unwrap()).unwrap();
        assert_eq!(on_disk["state"], "idle");
    }

    #[tokio::test]
    async fn status_survives_corrupt_state_file() {
        let fx = fixture();
        fs::write(&fx.state_file, "{not json").unwrap();

        let (status, body) = get_json(fx.app(), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");
        assert_eq!(body["progress"], 0);
    }

    #[tokio::test]
    async fn health_reports_ok_with_timestamp() {
        let fx = fixture();
        let (status, body) = get_json(fx.app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn index_is_404_without_frontend() {
        let fx = fixture();
        let (status, _) = get(fx.app(), "/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn serves_index_and_static_assets() {
        let fx = fixture();
        fs::create_dir_all(&fx.frontend_dir).unwrap();
        fs::write(fx.frontend_dir.join("index.html"), "<h1>office</h1>").unwrap();
        fs::write(fx.frontend_dir.join("app.js"), "console.log('hi');").unwrap();

        let (status, body) = get(fx.app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>office</h1>");

        let (status, body) = get(fx.app(), "/static/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"console.log('hi');");

        let (status, _) = get(fx.app(), "/static/missing.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
