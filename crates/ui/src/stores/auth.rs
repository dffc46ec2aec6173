//! Authentication container

use crate::navigation::{Capability, CapabilitySet};
use crate::state::{Container, Status};
use chrono::{DateTime, Utc};
use donation_client::{AuthApi, SessionHandle};
use donation_core::{AdminError, AdminResult, AuthUser, LoginRequest, Role, Session};
use std::sync::Arc;

/// What the rest of the client needs to know about the login
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub role: Option<Role>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AuthState {
    fn from_session(session: &Session) -> Self {
        Self {
            user: Some(session.user.clone()),
            role: Some(session.role()),
            expires_at: session.expires_at,
        }
    }
}

/// Login and logout against `/auth/login` and the session handle
pub struct AuthStore {
    api: Arc<dyn AuthApi>,
    session: SessionHandle,
    state: Container<AuthState>,
}

impl AuthStore {
    /// Create the store, picking up any active stored session
    pub fn new(api: Arc<dyn AuthApi>, session: SessionHandle) -> Self {
        let state = Container::new("auth");
        if let Some(active) = session.active() {
            state.update(|s| *s = AuthState::from_session(&active));
        }
        Self {
            api,
            session,
            state,
        }
    }

    /// Exchange credentials for a session and persist it
    pub async fn login(&self, username: &str, password: &str) -> AdminResult<Session> {
        if username.trim().is_empty() {
            return Err(AdminError::field_validation("login", "username", "Username is required"));
        }
        if password.is_empty() {
            return Err(AdminError::field_validation("login", "password", "Password is required"));
        }

        let ticket = self.state.begin_mutation();
        let request = LoginRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let outcome = match self.api.login(&request).await {
            Ok(response) => Session::from_login(response)
                .and_then(|session| self.session.set(session.clone()).map(|()| session)),
            Err(err) => Err(err.into()),
        };

        match outcome {
            Ok(session) => {
                self.state
                    .succeed(ticket, |s| *s = AuthState::from_session(&session));
                tracing::info!(user = %session.user.username, role = %session.role(), "logged in");
                Ok(session)
            }
            Err(err) => {
                self.state.fail(ticket, err.user_message());
                Err(err)
            }
        }
    }

    /// Forget the session everywhere
    pub fn logout(&self) -> AdminResult<()> {
        self.session.clear()?;
        self.state.reset();
        tracing::info!("logged out");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.active().is_some()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.state.with(|s| s.user.clone())
    }

    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    /// Capabilities of the current login; empty when logged out
    pub fn capabilities(&self) -> CapabilitySet {
        self.role().map(CapabilitySet::for_role).unwrap_or_default()
    }

    /// Fail locally unless the current login grants `capability`
    pub fn require(&self, capability: Capability) -> AdminResult<AuthUser> {
        let user = self.session.require_identity()?;
        if !self.capabilities().contains(capability) {
            return Err(AdminError::Forbidden(capability.action().to_string()));
        }
        Ok(user)
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeBackend, PASSWORD};

    #[tokio::test]
    async fn test_login_persists_session() {
        let session = SessionHandle::in_memory();
        let store = AuthStore::new(FakeBackend::with_users(vec![]), session.clone());
        assert!(!store.is_authenticated());

        let logged_in = store.login("amy", PASSWORD).await.unwrap();
        assert!(logged_in.expires_at.is_some());
        assert!(store.is_authenticated());
        assert_eq!(store.role(), Some(Role::User));
        assert_eq!(session.identity().unwrap().name, "Amy");
        assert_eq!(store.user().unwrap().username, "amy");
    }

    #[tokio::test]
    async fn test_failed_login_reports_backend_message() {
        let session = SessionHandle::in_memory();
        let store = AuthStore::new(FakeBackend::with_users(vec![]), session.clone());

        let err = store.login("amy", "wrong").await.unwrap_err();
        assert_eq!(err.user_message(), "Invalid credentials");
        assert_eq!(store.error().as_deref(), Some("Invalid credentials"));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_blank_credentials_are_rejected_locally() {
        let backend = FakeBackend::with_users(vec![]);
        let store = AuthStore::new(backend.clone(), SessionHandle::in_memory());

        assert!(store.login(" ", PASSWORD).await.unwrap_err().is_validation());
        assert!(store.login("amy", "").await.unwrap_err().is_validation());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_capabilities_follow_role() {
        let store = AuthStore::new(FakeBackend::with_users(vec![]), SessionHandle::in_memory());
        assert!(matches!(
            store.require(Capability::ViewDonations),
            Err(AdminError::Unauthenticated)
        ));

        store.login("amy", PASSWORD).await.unwrap();
        assert!(store.require(Capability::ManageDonations).is_ok());
        assert!(matches!(
            store.require(Capability::ManageUsers),
            Err(AdminError::Forbidden(_))
        ));

        let admin = AuthStore::new(FakeBackend::admin(), SessionHandle::in_memory());
        admin.login("root", PASSWORD).await.unwrap();
        assert!(admin.require(Capability::ManageUsers).is_ok());
        assert!(admin.require(Capability::ViewReports).is_ok());
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let session = SessionHandle::in_memory();
        let store = AuthStore::new(FakeBackend::with_users(vec![]), session.clone());
        store.login("amy", PASSWORD).await.unwrap();

        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
        assert!(session.current().is_none());
        assert!(store.capabilities().is_empty());
    }
}
