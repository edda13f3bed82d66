//! memerank-web library - meme rating web service
//!
//! Users step through a fixed sequence of images, rate each 1-5, and once
//! ranking is closed everyone sees a leaderboard sorted by average score.

use axum::Router;
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod catalog;
pub mod qr;
pub mod ranking;
pub mod session;

use catalog::Catalog;
use session::SessionRegistry;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (rating rows, append-only)
    pub db: SqlitePool,
    /// Fixed meme catalog, loaded at startup
    pub catalog: Arc<Catalog>,
    /// Live per-user sessions
    pub sessions: Arc<SessionRegistry>,
    /// Closing gate: results stay hidden behind a waiting view until true
    pub ranking_closed: Arc<AtomicBool>,
    /// Directory the meme images are served from
    pub meme_dir: PathBuf,
    /// host:port fallback for QR generation when no Host header is present
    pub public_addr: String,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, catalog: Catalog, meme_dir: PathBuf, public_addr: String) -> Self {
        let sessions = Arc::new(SessionRegistry::new(catalog.len()));
        Self {
            db,
            catalog: Arc::new(catalog),
            sessions,
            ranking_closed: Arc::new(AtomicBool::new(false)),
            meme_dir,
            public_addr,
        }
    }
}

/// Build application router
///
/// Page routes render HTML; action routes redirect back into the flow. The
/// meme directory is served read-only under /memes.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let meme_files = ServeDir::new(&state.meme_dir);

    Router::new()
        .route("/", get(api::home))
        .route("/rate", get(api::start_rating))
        .route("/rate/:user_id", get(api::rating_page))
        .route("/rate/:user_id/score/:rating", get(api::submit_rating))
        .route("/rate/:user_id/next", get(api::next_meme))
        .route("/rate/:user_id/prev", get(api::prev_meme))
        .route("/finish", get(api::finish))
        .route("/results", get(api::results))
        .route("/reset/:user_id", get(api::reset))
        .merge(api::health_routes())
        .nest_service("/memes", meme_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
