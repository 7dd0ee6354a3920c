//! Identity Session for LearnHub.
//!
//! Holds the single access credential of the running client. The session is
//! an owned handle injected into the gateway (which reads it for every
//! request) and into the core (which clears it when the service rejects it).

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::gateway::GatewayResult;
use crate::services::notifications::{EventChannel, Route};
use crate::types::session::{AccessToken, SessionState};

/// Trait defining identity session operations.
pub trait SessionManagerTrait {
    fn activate(&self, token: AccessToken);
    fn clear(&self) -> bool;
    fn state(&self) -> SessionState;
    fn bearer(&self) -> Option<String>;
}

/// Shared handle to the current credential. Clones observe the same session.
#[derive(Debug, Clone, Default)]
pub struct IdentitySession {
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl IdentitySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts out active with the given token.
    pub fn with_token(token: AccessToken) -> Self {
        let session = Self::new();
        session.activate(token);
        session
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Applies the redirect-on-unauthorized rule to a gateway result.
    ///
    /// An `Unauthorized` error clears the credential and requests the login
    /// route; the error is still returned to the caller.
    pub fn guard<T>(&self, result: GatewayResult<T>, events: &EventChannel) -> GatewayResult<T> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                warn!("service rejected the session credential, signing out");
                self.clear();
                events.navigate(Route::Login);
            }
        }
        result
    }
}

impl SessionManagerTrait for IdentitySession {
    fn activate(&self, token: AccessToken) {
        *self.token.write() = Some(token);
        info!("session activated");
    }

    /// Drops the credential. Returns whether one was held.
    fn clear(&self) -> bool {
        // AccessToken zeroizes itself on drop.
        let had_token = self.token.write().take().is_some();
        if had_token {
            info!("session cleared");
        }
        had_token
    }

    fn state(&self) -> SessionState {
        if self.token.read().is_some() {
            SessionState::Active
        } else {
            SessionState::None
        }
    }

    /// `Authorization` header value for the active credential.
    fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose()))
    }
}
