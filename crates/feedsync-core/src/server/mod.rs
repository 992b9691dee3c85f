//! HTTP surface for the feed catalog.

mod error;
mod handlers;
mod router;

use std::net::SocketAddr;
use std::future::Future;

use tokio::net::TcpListener;

pub use error::ApiError;
pub use handlers::{ListResponse, SharedCatalog};
pub use router::catalog_router;

use crate::Result;

/// Serve the catalog API on `addr` until `shutdown` resolves
pub async fn serve<F>(addr: &str, catalog: SharedCatalog, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr).await?;
    let local: SocketAddr = listener.local_addr()?;
    tracing::info!("Catalog server listening on http://{}", local);

    axum::serve(listener, catalog_router(catalog))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Catalog server stopped");
    Ok(())
}
