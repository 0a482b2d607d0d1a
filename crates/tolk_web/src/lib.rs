use std::sync::Arc;

use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod error;
pub mod handlers;
pub mod state;

pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/scrape", post(handlers::scrape))
        .route("/api/translate", post(handlers::translate))
        .route("/api/answer", post(handlers::answer))
        .route("/api/download", post(handlers::download))
        .layer(cors)
        .with_state(Arc::new(state))
}
