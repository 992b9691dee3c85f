//! Transient local HTTP responder used as the OAuth redirect target.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CONNECTION;
use axum::response::{Html, IntoResponse};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::Result;

/// How long a graceful shutdown may take before the server task is aborted
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

const CONFIRMATION_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">

<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>feedsync</title>
  <style>
    * {
      margin: 0;
      padding: 0;
    }

    .header {
      padding: 30px;
      text-align: left;
      background: #282828;
      color: white;
      font-size: 24px;
    }

    .content {
      text-align: center;
      margin-top: 16rem;
      font-size: 1.5rem;
    }
  </style>
</head>

<body>
  <header class="header">
    <h1>feedsync</h1>
  </header>
  <div class="content">
    <h2>Authentication Complete</h2>
    <div>Please return to your terminal.</div>
  </div>
</body>

</html>
"#;

struct CallbackState {
    completion: Mutex<Option<oneshot::Sender<()>>>,
    shutdown: watch::Sender<bool>,
}

/// Local HTTP server that answers the first callback and then stops.
///
/// Dropping the responder aborts the server task if it is still running.
pub struct CallbackResponder {
    addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl CallbackResponder {
    /// Bind to `addr` and start serving; `completion` fires on the first request
    pub async fn start(addr: SocketAddr, completion: oneshot::Sender<()>) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let state = Arc::new(CallbackState {
            completion: Mutex::new(Some(completion)),
            shutdown: shutdown_tx.clone(),
        });

        let router = Router::new().fallback(handle_callback).with_state(state);

        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.wait_for(|stop| *stop).await;
                })
                .await;

            if let Err(e) = result {
                warn!("Callback responder failed: {}", e);
            }
            debug!("Callback responder stopped");
        });

        info!("Callback responder listening on {}", addr);

        Ok(Self {
            addr,
            shutdown_tx,
            handle: Some(handle),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Redirect URI pointing at this responder
    pub fn redirect_uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the server and wait for it to exit. Safe to call repeatedly.
    pub async fn shutdown(&mut self) {
        self.shutdown_tx.send_replace(true);

        if let Some(mut handle) = self.handle.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, &mut handle).await.is_err() {
                warn!("Callback responder did not stop in time, aborting");
                handle.abort();
            }
        }
    }
}

impl Drop for CallbackResponder {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Find a free loopback address by binding port 0 and releasing it again
pub fn reserve_loopback_addr() -> Result<SocketAddr> {
    let listener = std::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0))?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr)
}

async fn handle_callback(State(state): State<Arc<CallbackState>>) -> impl IntoResponse {
    let sender = state.completion.lock().ok().and_then(|mut guard| guard.take());

    match sender {
        Some(tx) => {
            info!("Authorization callback received");
            let _ = tx.send(());
            state.shutdown.send_replace(true);
        }
        None => debug!("Ignoring repeated authorization callback"),
    }

    ([(CONNECTION, "close")], Html(CONFIRMATION_PAGE))
}
