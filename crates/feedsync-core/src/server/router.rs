//! Router configuration for the catalog API.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{insert_feed, list_feeds, SharedCatalog};

/// Create the catalog API router.
pub fn catalog_router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/v1/feeds", get(list_feeds).post(insert_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}
