//! User container

use crate::state::{Container, EntityState, Slot, Snapshot, Status};
use donation_client::UserApi;
use donation_core::{AdminResult, NewUser, User, UserId, UserUpdate, Validatable};
use std::sync::Arc;

/// Cached user list and detail backed by the user endpoints
pub struct UserStore {
    api: Arc<dyn UserApi>,
    state: Container<EntityState<User>>,
}

impl UserStore {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        Self {
            api,
            state: Container::new("users"),
        }
    }

    // ===== Actions =====

    /// Replace the cached list with the backend's
    pub async fn list(&self) -> AdminResult<Vec<User>> {
        let ticket = self.state.begin_fetch(Slot::Collection);
        let result = self.api.list_users().await;
        self.state.settle(ticket, result, |state, users| {
            state.collection = users.clone();
        })
    }

    /// Load one user into the detail slot.
    ///
    /// The previous detail is dropped first so an edit form never shows
    /// another user's values while the fetch is in flight.
    pub async fn fetch_detail(&self, id: UserId) -> AdminResult<User> {
        let ticket = self.state.begin_fetch(Slot::Detail);
        self.state.update(|state| state.detail = None);
        let result = self.api.get_user(id).await;
        self.state.settle(ticket, result, |state, user| {
            state.detail = Some(user.clone());
        })
    }

    pub async fn create(&self, user: &NewUser) -> AdminResult<User> {
        user.validate()?;
        let ticket = self.state.begin_mutation();
        let result = self.api.create_user(user).await;
        let created = self.state.settle(ticket, result, |state, user| {
            state.upsert(user.clone());
        })?;
        tracing::info!(id = %created.id, username = %created.username, "user created");
        Ok(created)
    }

    /// Register through the auth endpoint
    pub async fn register(&self, user: &NewUser) -> AdminResult<Option<User>> {
        user.validate()?;
        let ticket = self.state.begin_mutation();
        let result = self.api.register_user(user).await;
        let registered = self.state.settle(ticket, result, |state, user| {
            if let Some(user) = user {
                state.upsert(user.clone());
            }
        })?;
        tracing::info!(username = %user.username, "user registered");
        Ok(registered)
    }

    pub async fn update(&self, id: UserId, update: &UserUpdate) -> AdminResult<User> {
        update.validate()?;
        let ticket = self.state.begin_mutation();
        let result = self.api.update_user(id, update).await;
        let updated = self.state.settle(ticket, result, |state, user| {
            state.replace(id, user.clone());
        })?;
        tracing::info!(%id, "user updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: UserId) -> AdminResult<()> {
        let ticket = self.state.begin_mutation();
        let result = self.api.delete_user(id).await;
        self.state.settle(ticket, result, |state, _| state.remove(id))?;
        tracing::info!(%id, "user deleted");
        Ok(())
    }

    // ===== Readers =====

    pub fn users(&self) -> Vec<User> {
        self.state.with(|state| state.collection.clone())
    }

    pub fn detail(&self) -> Option<User> {
        self.state.with(|state| state.detail.clone())
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn error(&self) -> Option<String> {
        self.state.error()
    }

    pub fn snapshot(&self) -> Snapshot<EntityState<User>> {
        self.state.snapshot()
    }
}

// ============================================================================
// Tests
// ============================================================================
