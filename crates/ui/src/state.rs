//! State containers for the admin client
//!
//! A [`Container`] holds one entity's cached data plus the request status.
//! Every request takes a [`Ticket`] stamped with a sequence number; responses
//! to wholesale-replace requests are only applied while their ticket is still
//! the latest one issued for the same [`Slot`], so a slow response can never
//! overwrite a newer one.

use donation_client::ClientResult;
use donation_core::{AdminError, AdminResult, Identified};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

// ============================================================================
// Status
// ============================================================================

/// Request status of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Error,
}

impl Status {
    pub fn is_loading(&self) -> bool {
        matches!(self, Status::Loading)
    }
}

/// A data slot replaced wholesale by a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Collection,
    Detail,
    Summary,
    Monthly,
    DateRange,
}

/// Sequence stamp handed out when a request starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    slot: Option<Slot>,
}

// ============================================================================
// Container
// ============================================================================

#[derive(Debug)]
struct Inner<S> {
    data: S,
    status: Status,
    error: Option<String>,
    next_seq: u64,
    /// Sequence of the latest request of any kind
    status_seq: u64,
    /// Latest sequence per fenced slot
    latest: HashMap<Slot, u64>,
}

/// Point-in-time copy of a container
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    pub data: S,
    pub status: Status,
    pub error: Option<String>,
}

/// Cached data plus request status, shared between a store and its readers
#[derive(Debug)]
pub struct Container<S> {
    name: &'static str,
    inner: RwLock<Inner<S>>,
}

impl<S: Clone + Default> Container<S> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: RwLock::new(Inner {
                data: S::default(),
                status: Status::Idle,
                error: None,
                next_seq: 0,
                status_seq: 0,
                latest: HashMap::new(),
            }),
        }
    }

    fn read_inner(&self) -> RwLockReadGuard<'_, Inner<S>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_inner(&self) -> RwLockWriteGuard<'_, Inner<S>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a fetch that replaces `slot` wholesale
    pub fn begin_fetch(&self, slot: Slot) -> Ticket {
        self.begin(Some(slot))
    }

    /// Start a mutation whose result is always merged
    pub fn begin_mutation(&self) -> Ticket {
        self.begin(None)
    }

    fn begin(&self, slot: Option<Slot>) -> Ticket {
        let mut inner = self.write_inner();
        inner.next_seq += 1;
        let seq = inner.next_seq;
        inner.status_seq = seq;
        inner.status = Status::Loading;
        inner.error = None;
        if let Some(slot) = slot {
            inner.latest.insert(slot, seq);
        }
        Ticket { seq, slot }
    }

    /// Apply a successful response. Returns `false` when it was stale.
    pub fn succeed(&self, ticket: Ticket, apply: impl FnOnce(&mut S)) -> bool {
        let mut inner = self.write_inner();
        let fresh = match ticket.slot {
            Some(slot) => inner.latest.get(&slot) == Some(&ticket.seq),
            None => true,
        };
        if fresh {
            apply(&mut inner.data);
        } else {
            tracing::debug!(
                container = self.name,
                seq = ticket.seq,
                slot = ?ticket.slot,
                "discarding stale response"
            );
        }
        if inner.status_seq == ticket.seq {
            inner.status = Status::Idle;
        }
        fresh
    }

    /// Record a failure; data slots are left untouched
    pub fn fail(&self, ticket: Ticket, message: impl Into<String>) {
        let message = message.into();
        let mut inner = self.write_inner();
        if inner.status_seq == ticket.seq {
            inner.status = Status::Error;
            inner.error = Some(message);
        } else {
            tracing::debug!(container = self.name, seq = ticket.seq, "superseded failure ignored");
        }
    }

    /// Settle a ticket with a backend result.
    ///
    /// On success `apply` merges the value into the data; on failure the
    /// status becomes `Error` with the backend's message.
    pub fn settle<T>(
        &self,
        ticket: Ticket,
        result: ClientResult<T>,
        apply: impl FnOnce(&mut S, &T),
    ) -> AdminResult<T> {
        match result {
            Ok(value) => {
                self.succeed(ticket, |data| apply(data, &value));
                Ok(value)
            }
            Err(err) => {
                let err: AdminError = err.into();
                self.fail(ticket, err.user_message());
                Err(err)
            }
        }
    }

    /// Modify data outside of a request
    pub fn update(&self, apply: impl FnOnce(&mut S)) {
        apply(&mut self.write_inner().data);
    }

    /// Read from the data without cloning it
    pub fn with<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.read_inner().data)
    }

    pub fn status(&self) -> Status {
        self.read_inner().status
    }

    pub fn error(&self) -> Option<String> {
        self.read_inner().error.clone()
    }

    pub fn snapshot(&self) -> Snapshot<S> {
        let inner = self.read_inner();
        Snapshot {
            data: inner.data.clone(),
            status: inner.status,
            error: inner.error.clone(),
        }
    }

    /// Drop all data and status
    pub fn reset(&self) {
        let mut inner = self.write_inner();
        inner.data = S::default();
        inner.status = Status::Idle;
        inner.error = None;
        inner.latest.clear();
    }
}

// ============================================================================
// Entity State
// ============================================================================

/// Collection and detail slots of one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState<T> {
    pub collection: Vec<T>,
    pub detail: Option<T>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            collection: Vec::new(),
            detail: None,
        }
    }
}

impl<T: Identified + Clone> EntityState<T> {
    /// Append a created entity, replacing an existing entry with the same id
    pub fn upsert(&mut self, entity: T) {
        match self.collection.iter_mut().find(|e| e.id() == entity.id()) {
            Some(existing) => *existing = entity,
            None => self.collection.push(entity),
        }
    }

    /// Replace the entry with `id`, keeping its position.
    /// Returns `false` when no entry matches.
    pub fn replace(&mut self, id: T::Id, entity: T) -> bool {
        if self.detail.as_ref().is_some_and(|d| d.id() == id) {
            self.detail = Some(entity.clone());
        }
        match self.collection.iter_mut().find(|e| e.id() == id) {
            Some(existing) => {
                *existing = entity;
                true
            }
            None => {
                tracing::warn!(
                    entity = T::KIND,
                    %id,
                    "updated entry not in the cached list; list left unchanged"
                );
                false
            }
        }
    }

    /// Remove every entry with `id`
    pub fn remove(&mut self, id: T::Id) {
        self.collection.retain(|e| e.id() != id);
        if self.detail.as_ref().is_some_and(|d| d.id() == id) {
            self.detail = None;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use donation_client::ClientError;
    use donation_core::{Contributor, Donation, DonationId, UserId};

    fn donation(id: i64, amount: f64) -> Donation {
        Donation {
            id: DonationId::new(id),
            amount,
            description: String::new(),
            user: Contributor::new(UserId::new(2), "Amy"),
        }
    }

    #[test]
    fn test_stale_fetch_is_discarded() {
        let container: Container<Vec<u32>> = Container::new("test");
        let older = container.begin_fetch(Slot::Collection);
        let newer = container.begin_fetch(Slot::Collection);

        assert!(container.succeed(newer, |data| *data = vec![2]));
        assert!(!container.succeed(older, |data| *data = vec![1]));

        let snapshot = container.snapshot();
        assert_eq!(snapshot.data, vec![2]);
        assert_eq!(snapshot.status, Status::Idle);
    }

    #[test]
    fn test_slots_are_fenced_independently() {
        let container: Container<(u32, u32)> = Container::new("test");
        let list = container.begin_fetch(Slot::Collection);
        let detail = container.begin_fetch(Slot::Detail);

        assert!(container.succeed(list, |data| data.0 = 1));
        assert_eq!(container.status(), Status::Loading);
        assert!(container.succeed(detail, |data| data.1 = 1));
        assert_eq!(container.status(), Status::Idle);
        assert_eq!(container.with(|data| *data), (1, 1));
    }

    #[test]
    fn test_mutations_always_merge() {
        let container: Container<Vec<u32>> = Container::new("test");
        let first = container.begin_mutation();
        let second = container.begin_mutation();
        assert!(container.succeed(second, |data| data.push(2)));
        assert!(container.succeed(first, |data| data.push(1)));
        assert_eq!(container.with(Vec::clone), vec![2, 1]);
    }

    #[test]
    fn test_failure_keeps_data() {
        let container: Container<Vec<u32>> = Container::new("test");
        container.update(|data| data.push(7));

        let ticket = container.begin_mutation();
        let result: AdminResult<()> = container.settle(
            ticket,
            Err(ClientError::from_body(400, r#"{"message":"description required"}"#)),
            |_, _| unreachable!(),
        );

        assert!(result.is_err());
        let snapshot = container.snapshot();
        assert_eq!(snapshot.data, vec![7]);
        assert_eq!(snapshot.status, Status::Error);
        assert_eq!(snapshot.error.as_deref(), Some("description required"));
    }

    #[test]
    fn test_superseded_failure_does_not_set_error() {
        let container: Container<Vec<u32>> = Container::new("test");
        let older = container.begin_fetch(Slot::Collection);
        let newer = container.begin_fetch(Slot::Collection);
        container.succeed(newer, |data| *data = vec![1]);
        container.fail(older, "timeout");

        assert_eq!(container.status(), Status::Idle);
        assert_eq!(container.error(), None);
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let container: Container<Vec<u32>> = Container::new("test");
        let ticket = container.begin_mutation();
        container.fail(ticket, "boom");
        assert_eq!(container.error().as_deref(), Some("boom"));

        container.begin_fetch(Slot::Collection);
        assert_eq!(container.error(), None);
        assert!(container.status().is_loading());
    }

    #[test]
    fn test_upsert_keeps_single_entry() {
        let mut state = EntityState::default();
        state.upsert(donation(1, 10.0));
        state.upsert(donation(2, 20.0));
        state.upsert(donation(1, 15.0));

        assert_eq!(state.collection.len(), 2);
        assert_eq!(state.collection[0].amount, 15.0);
    }

    #[test]
    fn test_replace_preserves_order() {
        let mut state = EntityState {
            collection: vec![donation(1, 10.0), donation(2, 20.0), donation(3, 30.0)],
            detail: Some(donation(2, 20.0)),
        };

        assert!(state.replace(DonationId::new(2), donation(2, 25.0)));
        let amounts: Vec<f64> = state.collection.iter().map(|d| d.amount).collect();
        assert_eq!(amounts, vec![10.0, 25.0, 30.0]);
        assert_eq!(state.detail.as_ref().unwrap().amount, 25.0);

        let before = state.collection.clone();
        assert!(!state.replace(DonationId::new(9), donation(9, 1.0)));
        assert_eq!(state.collection, before);
    }

    #[test]
    fn test_remove_by_id() {
        let mut state = EntityState {
            collection: vec![donation(1, 10.0), donation(2, 20.0), donation(3, 30.0)],
            detail: None,
        };
        state.remove(DonationId::new(2));
        let ids: Vec<i64> = state.collection.iter().map(|d| d.id.value()).collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
