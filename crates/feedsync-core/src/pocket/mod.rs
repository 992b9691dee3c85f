//! Client for the read-later service's v3 API.

mod client;
mod models;

pub use client::{authorize_url, ArticlePublisher, PocketClient};
pub use models::{AuthorizeResponse, Credentials};
