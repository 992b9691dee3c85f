use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::models::{
    AddLinkRequest, AuthorizeRequest, AuthorizeResponse, Credentials, RequestTokenRequest,
    RequestTokenResponse,
};
use crate::config::PocketConfig;
use crate::{Error, Result};

const REQUEST_TOKEN_PATH: &str = "/v3/oauth/request";
const AUTHORIZE_PATH: &str = "/v3/oauth/authorize";
const ADD_PATH: &str = "/v3/add";
const USER_AUTHORIZE_PATH: &str = "/auth/authorize";
const ERROR_HEADER: &str = "X-Error";

/// Pushes a single article URL to the read-later service
#[async_trait::async_trait]
pub trait ArticlePublisher: Send + Sync {
    async fn publish(&self, url: &str) -> Result<()>;
}

/// Client for the read-later service.
///
/// The OAuth endpoints only need the consumer key; publishing additionally
/// needs an access token set through [`PocketClient::with_credentials`].
#[derive(Clone)]
pub struct PocketClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl PocketClient {
    pub fn new(config: &PocketConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: Credentials::default(),
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("X-Accept", "application/json")
            .json(body)
            .send()
            .await?;

        Ok(response)
    }

    /// Ask for a request code bound to `redirect_uri`
    pub async fn request_token(&self, consumer_key: &str, redirect_uri: &str) -> Result<String> {
        let body = RequestTokenRequest {
            consumer_key,
            redirect_uri,
        };
        let response = self.post_json(REQUEST_TOKEN_PATH, &body).await?;
        let decoded: RequestTokenResponse = decode_oauth_response(response).await?;
        Ok(decoded.code)
    }

    /// Trade a consented request code for an access token
    pub async fn authorize(&self, consumer_key: &str, code: &str) -> Result<AuthorizeResponse> {
        let body = AuthorizeRequest { consumer_key, code };
        let response = self.post_json(AUTHORIZE_PATH, &body).await?;
        decode_oauth_response(response).await
    }

    /// Add a link to the user's list
    pub async fn add_link(&self, link: &str) -> Result<()> {
        let body = AddLinkRequest {
            url: link,
            consumer_key: &self.credentials.consumer_key,
            access_token: &self.credentials.access_token,
        };

        let response = self.post_json(ADD_PATH, &body).await?;
        if response.status() != StatusCode::OK {
            return Err(service_error(&response));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ArticlePublisher for PocketClient {
    async fn publish(&self, url: &str) -> Result<()> {
        self.add_link(url).await
    }
}

/// Build the user-facing consent URL for a request code
pub fn authorize_url(base_url: &str, code: &str, redirect_uri: &str) -> Result<Url> {
    let url = Url::parse_with_params(
        &format!("{}{}", base_url.trim_end_matches('/'), USER_AUTHORIZE_PATH),
        &[("request_token", code), ("redirect_uri", redirect_uri)],
    )?;
    Ok(url)
}

fn service_error(response: &Response) -> Error {
    let detail = response
        .headers()
        .get(ERROR_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    Error::Service {
        status: response.status().as_u16(),
        detail,
    }
}

async fn decode_oauth_response<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status().as_u16() >= 300 {
        return Err(service_error(&response));
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| Error::Decode(e.to_string()))
}
