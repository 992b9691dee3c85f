pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod pocket;
pub mod server;
pub mod session;
pub mod state;
pub mod storage;
pub mod sync;

pub use auth::AuthorizationCoordinator;
pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::Session;
pub use sync::SyncEngine;
