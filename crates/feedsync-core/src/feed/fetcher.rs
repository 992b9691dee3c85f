use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, Proxy};
use url::Url;

use super::models::FetchedItem;
use super::parser::parse_feed;
use crate::config::AppConfig;
use crate::{Error, Result};

const MAX_FEED_BYTES: usize = 5 * 1024 * 1024;
const FEEDSYNC_USER_AGENT: &str = concat!("feedsync/", env!("CARGO_PKG_VERSION"));

/// Source of feed items, newest first
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, link: &str) -> Result<Vec<FetchedItem>>;
}

/// Feed fetcher backed by an HTTP client
pub struct FeedFetcher {
    client: Client,
}

impl FeedFetcher {
    /// Create a new feed fetcher with configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::build_client(config.sync.request_timeout_secs, &config.sync.proxy_url)?;
        Ok(Self { client })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .default_headers(Self::build_headers())
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::validation(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for feed fetching");
        }

        Ok(builder.build()?)
    }

    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "application/rss+xml,application/atom+xml,application/xml;q=0.9,text/xml;q=0.8,*/*;q=0.5",
            ),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(FEEDSYNC_USER_AGENT));
        headers
    }

    /// Fetch raw feed bytes, enforcing status and size limits
    pub async fn fetch_raw(&self, link: &str) -> Result<Vec<u8>> {
        Url::parse(link)?;

        tracing::debug!("Fetching feed from: {}", link);

        let response = self.client.get(link).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Service {
                status: status.as_u16(),
                detail: Some(format!("fetching {}", link)),
            });
        }

        if let Some(len) = response.content_length() {
            ensure_content_size(len as usize, link)?;
        }

        let bytes = response.bytes().await?;
        ensure_content_size(bytes.len(), link)?;

        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl FeedSource for FeedFetcher {
    async fn fetch(&self, link: &str) -> Result<Vec<FetchedItem>> {
        let content = self.fetch_raw(link).await?;
        parse_feed(&content)
    }
}

fn ensure_content_size(size: usize, url: &str) -> Result<()> {
    if size > MAX_FEED_BYTES {
        return Err(Error::Decode(format!(
            "Feed too large ({} bytes) for URL: {}",
            size, url
        )));
    }
    Ok(())
}
