//! Per-invocation wiring: config, session, HTTP client and stores

use crate::config::ClientConfig;
use crate::output::TerminalNotifier;
use donation_client::{ApiClient, FileSessionStore, SessionHandle};
use donation_core::{AdminResult, ResultExt};
use donation_ui::{AuthStore, DonationStore, UserStore};
use std::sync::Arc;

/// Everything a command needs
#[derive(Debug)]
pub struct AppContext {
    pub config: ClientConfig,
    pub session: SessionHandle,
    pub client: Arc<ApiClient>,
    pub notifier: TerminalNotifier,
}

impl AppContext {
    /// Open the session file and build a client against the configured backend
    pub fn new(config: ClientConfig) -> AdminResult<Self> {
        let store = FileSessionStore::new(config.session_path());
        tracing::debug!(path = %store.path().display(), "opening session file");
        let session = SessionHandle::open(Arc::new(store)).with_context("Cannot open session")?;
        let client = ApiClient::with_timeout(&config.base_url, session.clone(), config.timeout())?;
        Ok(Self {
            config,
            session,
            client: Arc::new(client),
            notifier: TerminalNotifier,
        })
    }

    pub fn auth_store(&self) -> AuthStore {
        AuthStore::new(self.client.clone(), self.session.clone())
    }

    pub fn user_store(&self) -> UserStore {
        UserStore::new(self.client.clone())
    }

    pub fn donation_store(&self) -> DonationStore {
        DonationStore::new(self.client.clone())
    }
}
