use serde::{Deserialize, Serialize};

/// Credentials for the read-later service.
///
/// `access_token` stays empty until an authorization handshake succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub access_token: String,
    pub username: String,
}

impl Credentials {
    pub fn is_authorized(&self) -> bool {
        !self.access_token.is_empty()
    }
}

#[derive(Serialize)]
pub(crate) struct RequestTokenRequest<'a> {
    pub consumer_key: &'a str,
    pub redirect_uri: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct RequestTokenResponse {
    pub code: String,
}

#[derive(Serialize)]
pub(crate) struct AuthorizeRequest<'a> {
    pub consumer_key: &'a str,
    pub code: &'a str,
}

/// Body returned by the authorize endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Serialize)]
pub(crate) struct AddLinkRequest<'a> {
    pub url: &'a str,
    pub consumer_key: &'a str,
    pub access_token: &'a str,
}
