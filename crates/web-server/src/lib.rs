// In crates/web-server/src/lib.rs

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use app_config::types::{LeaderboardSettings, ServerSettings};
use leaderboard::{LeaderboardEngine, LeaderboardPage};
use tokio::net::TcpListener;

pub mod error;
pub mod types;

// Re-export our custom error type for convenience.
pub use error::{Error, Result};
pub use types::LeaderboardParams;

/// The shared application state that is available to all API handlers.
///
/// It is wrapped in an `Arc` to allow for safe concurrent access.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<LeaderboardEngine>,
    /// Page size applied when the request omits `limit`.
    pub default_page_size: u32,
}

/// Creates the main application router with all routes and middleware.
///
/// # Arguments
///
/// * `app_state`: The shared `AppState` containing the leaderboard engine.
///
/// # Returns
///
/// The configured `axum::Router`.
pub fn create_router(app_state: AppState) -> Router {
    // Define a CORS layer to allow requests from our frontend.
    // In a production environment, you would restrict the origin to your actual frontend domain.
    let cors = tower_http::cors::CorsLayer::new()
        .allow_origin(tower_http::cors::Any) // For development, allow any origin
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any);

    // Define the API sub-router
    let api_router = Router::new().route("/leaderboard", get(get_leaderboard_handler));

    // The main router.
    Router::new()
        .route("/health", get(health_check_handler))
        .nest("/api", api_router)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// A simple health check handler.
/// Responds with a 200 OK and a plain body.
async fn health_check_handler() -> &'static str {
    "OK"
}

/// The handler for `GET /api/leaderboard`.
///
/// Validates pagination at the boundary, then runs the full
/// compute-from-scratch leaderboard pipeline.
async fn get_leaderboard_handler(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Result<Json<LeaderboardPage>> {
    let query = params.validate(state.default_page_size)?;
    let page = state.engine.compute(&query).await?;
    Ok(Json(page))
}

/// The main entry point for running the web server.
///
/// This function sets up the TCP listener and serves the application router.
/// It will run forever until the process is terminated.
pub async fn run(
    server: ServerSettings,
    leaderboard: LeaderboardSettings,
    engine: Arc<LeaderboardEngine>,
) -> anyhow::Result<()> {
    let app_state = AppState {
        engine,
        default_page_size: leaderboard.default_page_size,
    };
    let router = create_router(app_state);

    let addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Web server listening");

    axum::serve(listener, router).await?;
    Ok(())
}
