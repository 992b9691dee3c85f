use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::oneshot;
use url::Url;

use super::responder::{reserve_loopback_addr, CallbackResponder};
use crate::config::AppConfig;
use crate::pocket::{authorize_url, Credentials, PocketClient};
use crate::{Error, Result};

/// Progress of one authorization handshake. Every failure is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    RequestSent,
    AwaitingUserConsent,
    CallbackReceived,
    Exchanging,
    Authorized,
    Failed,
}

/// State of a handshake in flight, owned by the caller between steps
pub struct AuthorizationSession {
    consumer_key: String,
    request_code: String,
    authorize_url: Url,
    responder: CallbackResponder,
    completion: oneshot::Receiver<()>,
    state: HandshakeState,
}

impl AuthorizationSession {
    pub fn request_code(&self) -> &str {
        &self.request_code
    }

    /// URL the user must open to grant access
    pub fn authorize_url(&self) -> &Url {
        &self.authorize_url
    }

    pub fn callback_address(&self) -> SocketAddr {
        self.responder.addr()
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    fn transition(&mut self, next: HandshakeState) {
        log_transition(self.state, next);
        self.state = next;
    }

    fn expect_state(&self, expected: HandshakeState) -> Result<()> {
        if self.state != expected {
            return Err(Error::validation(format!(
                "Authorization handshake is {:?}, expected {:?}",
                self.state, expected
            )));
        }
        Ok(())
    }

    async fn fail(&mut self, error: Error) -> Error {
        self.transition(HandshakeState::Failed);
        self.responder.shutdown().await;
        error
    }
}

fn log_transition(from: HandshakeState, to: HandshakeState) {
    tracing::info!("Authorization handshake: {:?} -> {:?}", from, to);
}

/// Runs the request code -> user consent -> access token exchange
pub struct AuthorizationCoordinator {
    client: PocketClient,
    consent_timeout: Option<Duration>,
}

impl AuthorizationCoordinator {
    /// `consent_timeout` of `None` waits for the browser callback indefinitely
    pub fn new(client: PocketClient, consent_timeout: Option<Duration>) -> Self {
        Self {
            client,
            consent_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = match config.auth.consent_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Ok(Self::new(PocketClient::new(&config.pocket)?, timeout))
    }

    /// Start the local responder and obtain a request code bound to it
    pub async fn start_handshake(&self, consumer_key: &str) -> Result<AuthorizationSession> {
        if consumer_key.trim().is_empty() {
            return Err(Error::validation("A consumer key is required to authenticate"));
        }

        let addr = reserve_loopback_addr()?;
        let (tx, rx) = oneshot::channel();
        let mut responder = CallbackResponder::start(addr, tx).await?;
        let redirect_uri = responder.redirect_uri();

        log_transition(HandshakeState::Idle, HandshakeState::RequestSent);

        let request_code = match self.client.request_token(consumer_key, &redirect_uri).await {
            Ok(code) => code,
            Err(e) => {
                log_transition(HandshakeState::RequestSent, HandshakeState::Failed);
                responder.shutdown().await;
                return Err(e);
            }
        };

        let authorize_url = match authorize_url(self.client.base_url(), &request_code, &redirect_uri) {
            Ok(url) => url,
            Err(e) => {
                log_transition(HandshakeState::RequestSent, HandshakeState::Failed);
                responder.shutdown().await;
                return Err(e);
            }
        };

        let mut session = AuthorizationSession {
            consumer_key: consumer_key.to_string(),
            request_code,
            authorize_url,
            responder,
            completion: rx,
            state: HandshakeState::RequestSent,
        };
        session.transition(HandshakeState::AwaitingUserConsent);

        Ok(session)
    }

    /// Block until the responder has seen the browser callback
    pub async fn wait_for_completion(&self, session: &mut AuthorizationSession) -> Result<()> {
        session.expect_state(HandshakeState::AwaitingUserConsent)?;

        let received = match self.consent_timeout {
            Some(limit) => match tokio::time::timeout(limit, &mut session.completion).await {
                Ok(received) => received,
                Err(_) => return Err(session.fail(Error::ConsentTimeout(limit)).await),
            },
            None => (&mut session.completion).await,
        };

        if received.is_err() {
            let error = Error::Other("Callback responder stopped before the callback arrived".into());
            return Err(session.fail(error).await);
        }

        session.transition(HandshakeState::CallbackReceived);
        session.responder.shutdown().await;
        Ok(())
    }

    /// Trade the consented request code for credentials, ending the session
    pub async fn exchange_token(&self, mut session: AuthorizationSession) -> Result<Credentials> {
        if let Err(e) = session.expect_state(HandshakeState::CallbackReceived) {
            return Err(session.fail(e).await);
        }

        session.transition(HandshakeState::Exchanging);

        let response = match self
            .client
            .authorize(&session.consumer_key, &session.request_code)
            .await
        {
            Ok(response) => response,
            Err(e) => return Err(session.fail(e).await),
        };

        if response.access_token.is_empty() {
            tracing::warn!("Authorization succeeded but the service returned an empty access token");
        }

        session.transition(HandshakeState::Authorized);
        session.responder.shutdown().await;

        Ok(Credentials {
            consumer_key: session.consumer_key,
            access_token: response.access_token,
            username: response.username,
        })
    }

    /// Run the whole handshake; `on_authorize_url` surfaces the consent URL to the user
    pub async fn authorize<F>(&self, consumer_key: &str, on_authorize_url: F) -> Result<Credentials>
    where
        F: FnOnce(&Url),
    {
        let mut session = self.start_handshake(consumer_key).await?;
        on_authorize_url(session.authorize_url());
        self.wait_for_completion(&mut session).await?;
        self.exchange_token(session).await
    }
}
