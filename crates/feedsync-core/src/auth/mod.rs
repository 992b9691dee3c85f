//! Local-callback OAuth handshake.
//!
//! A transient HTTP responder on an ephemeral loopback port acts as the
//! redirect target, so no public redirect endpoint has to be registered.

mod coordinator;
mod responder;

pub use coordinator::{AuthorizationCoordinator, AuthorizationSession, HandshakeState};
pub use responder::{reserve_loopback_addr, CallbackResponder};
