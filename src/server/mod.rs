//! Read-only JSON API over a loaded record store
//!
//! List endpoints answer with the same envelope the backend uses, so one
//! running instance can serve as another's live source.

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::storage::PrefsStore;
use crate::store::{LoadOrigin, RecordStore};

pub mod routes;

/// Server state
pub struct AppState {
    pub store: RecordStore,
    pub origin: LoadOrigin,
    pub prefs: Mutex<PrefsStore>,
}

impl AppState {
    pub fn new(store: RecordStore, origin: LoadOrigin, prefs: PrefsStore) -> Self {
        Self {
            store,
            origin,
            prefs: Mutex::new(prefs),
        }
    }
}

/// Build the API router. When `static_dir` is set, unmatched paths are
/// served from it (a prebuilt front end).
pub fn router(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/stats", get(routes::get_stats))
        .route("/companies", get(routes::list_companies))
        .route("/companies/{id}", get(routes::get_company))
        .route("/companies/{id}/news", get(routes::get_company_news))
        .route("/companies/{id}/investors", get(routes::get_company_investors))
        .route("/vcs", get(routes::list_vcs))
        .route("/vcs/{id}", get(routes::get_vc))
        .route("/news", get(routes::list_news))
        .route("/news/{id}", get(routes::get_article))
        .route("/search", get(routes::search))
        .route("/top/{kind}", get(routes::top))
        .route(
            "/recent-searches",
            get(routes::recent_searches).delete(routes::clear_recent_searches),
        );

    let app = match static_dir {
        Some(dir) => app.fallback_service(ServeDir::new(dir)),
        None => app,
    };

    app.layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    port: u16,
    state: Arc<AppState>,
    static_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let app = router(state, static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
