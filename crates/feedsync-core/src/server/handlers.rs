//! Catalog handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::error::ApiError;
use crate::storage::{CatalogedFeed, FeedCatalog, NewCatalogFeed};
use crate::Error;

/// Shared handler state
pub type SharedCatalog = Arc<dyn FeedCatalog>;

/// Envelope for list responses
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub response: Vec<T>,
}

/// GET /v1/feeds - List all cataloged feeds.
pub async fn list_feeds(
    State(catalog): State<SharedCatalog>,
) -> Result<Json<ListResponse<CatalogedFeed>>, ApiError> {
    let feeds = catalog.list().await?;
    Ok(Json(ListResponse { response: feeds }))
}

/// POST /v1/feeds - Add a feed to the catalog.
pub async fn insert_feed(
    State(catalog): State<SharedCatalog>,
    body: Result<Json<NewCatalogFeed>, JsonRejection>,
) -> Result<(StatusCode, Json<CatalogedFeed>), ApiError> {
    let Json(new_feed) = body.map_err(|e| {
        tracing::debug!("Rejected catalog insert: {}", e);
        ApiError::bad_request("invalid request body")
    })?;

    if new_feed.url.trim().is_empty() {
        return Err(Error::validation("url must not be empty").into());
    }

    let id = catalog.insert(&new_feed).await?;
    tracing::info!("Cataloged feed {} ({})", id, new_feed.url);

    Ok((
        StatusCode::CREATED,
        Json(CatalogedFeed {
            id,
            name: new_feed.name,
            url: new_feed.url,
        }),
    ))
}
