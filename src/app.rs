//! App Core for LearnHub.
//!
//! Composition root wiring the session, gateway, collection store and flow
//! controller together, plus the account-level actions (login, logout) that
//! sit outside the mutation flows.

use std::sync::Arc;

use tracing::{info, warn};

use crate::gateway::{GatewayResult, RemoteGateway};
use crate::managers::collection_store::CollectionStore;
use crate::managers::flow_controller::MutationFlowController;
use crate::managers::session_manager::{IdentitySession, SessionManagerTrait};
use crate::services::notifications::{EventChannel, EventReceiver, Route};
use crate::types::bookmark::Tag;
use crate::types::errors::GatewayError;
use crate::types::session::AccessToken;
use crate::types::settings::ClientSettings;

/// Central client struct. The store and the flow controller are separate
/// fields so a flow can borrow the store mutably while it runs.
pub struct App {
    pub settings: ClientSettings,
    pub session: IdentitySession,
    pub store: CollectionStore,
    pub flows: MutationFlowController,
    gateway: Arc<dyn RemoteGateway>,
    events: EventChannel,
}

impl App {
    /// Wires an app around an existing gateway and session.
    ///
    /// The gateway must read its credential from the same `session`.
    pub fn new(
        settings: ClientSettings,
        gateway: Arc<dyn RemoteGateway>,
        session: IdentitySession,
    ) -> (Self, EventReceiver) {
        let (events, receiver) = EventChannel::channel();
        let store = CollectionStore::new(gateway.clone(), session.clone(), events.clone());
        let flows = MutationFlowController::new(gateway.clone(), session.clone(), events.clone());
        let app = Self {
            settings,
            session,
            store,
            flows,
            gateway,
            events,
        };
        (app, receiver)
    }

    /// Builds an app talking to the configured HTTP service.
    #[cfg(feature = "network")]
    pub fn connect(
        settings: ClientSettings,
        token: Option<AccessToken>,
    ) -> GatewayResult<(Self, EventReceiver)> {
        let session = IdentitySession::new();
        if let Some(token) = token {
            session.activate(token);
        }
        let gateway = crate::gateway::http::HttpGateway::new(&settings.api, session.clone())?;
        Ok(Self::new(settings, Arc::new(gateway), session))
    }

    /// Initial load. Without a credential the user is sent to login.
    pub async fn startup(&mut self) -> GatewayResult<()> {
        if !self.session.is_active() {
            self.events.navigate(Route::Login);
            return Err(GatewayError::Unauthorized);
        }
        self.store.load_all().await
    }

    /// Exchanges credentials for a token, activates the session and loads.
    ///
    /// Returns the issued token so the caller can persist it. Only the
    /// credential exchange decides the result: a failed initial load keeps
    /// the session active and is reported as an error notice instead.
    pub async fn login(&mut self, email: &str, password: &str) -> GatewayResult<AccessToken> {
        let token = AccessToken::new(self.gateway.login(email, password).await?);
        self.session.activate(token.clone());
        info!(email, "logged in");
        if let Err(e) = self.store.load_all().await {
            warn!(error = %e, "initial load after login failed");
            if !e.is_unauthorized() {
                self.events
                    .error(e.user_message("Logged in, but loading your bookmarks failed"));
            }
        }
        Ok(token)
    }

    pub async fn register(&self, email: &str, password: &str, role: &str) -> GatewayResult<()> {
        self.gateway.register(email, password, role).await
    }

    /// Ends the session and requests the login route. Collections are kept.
    pub fn logout(&mut self) {
        self.session.clear();
        self.events.navigate(Route::Login);
    }

    pub async fn tags(&self) -> GatewayResult<Vec<Tag>> {
        let result = self.gateway.list_tags().await;
        self.session.guard(result, &self.events)
    }

    pub async fn popular_tags(&self) -> GatewayResult<Vec<Tag>> {
        let result = self.gateway.list_popular_tags().await;
        self.session.guard(result, &self.events)
    }
}
