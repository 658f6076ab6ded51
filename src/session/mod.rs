//! Session snapshot tracking.
//!
//! A session is an immutable snapshot of (identity, loaded events, derived
//! attending-set). The snapshot is rebuilt whenever either upstream input
//! changes and published over a watch channel; nothing mutates it in place.
//! The attending-set is reconciled with a single batched store query instead
//! of one existence check per event, so a mid-flight event-list change can
//! never interleave with a stale fan-out.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use crate::models::{Event, User};
use crate::repository::AttendanceStore;
use crate::utils::error::{AppError, AppResult};

/// Auth state is three-valued: `Unknown` (not yet resolved) must never be
/// treated as signed-out.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum Identity {
    Unknown,
    SignedOut,
    SignedIn(User),
}

impl Identity {
    pub fn user(&self) -> Option<&User> {
        match self {
            Identity::SignedIn(user) => Some(user),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub identity: Identity,
    pub events: Vec<Event>,
    pub attending_event_ids: HashSet<Uuid>,
}

impl SessionSnapshot {
    fn empty() -> Self {
        Self {
            identity: Identity::Unknown,
            events: Vec::new(),
            attending_event_ids: HashSet::new(),
        }
    }

    /// Builds a snapshot with the attending-set reconciled against the store.
    ///
    /// `previous` is carried over verbatim while identity is still unknown.
    /// A store failure degrades to an empty set and is only logged; the
    /// worst case is a stale view, never a hard error.
    pub async fn reconciled(
        identity: Identity,
        events: Vec<Event>,
        previous: &HashSet<Uuid>,
        store: &dyn AttendanceStore,
    ) -> Self {
        let attending_event_ids = match &identity {
            Identity::Unknown => previous.clone(),
            Identity::SignedOut => HashSet::new(),
            Identity::SignedIn(user) => match store.attending_event_ids(user.id).await {
                Ok(all) => {
                    let loaded: HashSet<Uuid> = events.iter().map(|e| e.id).collect();
                    all.intersection(&loaded).copied().collect()
                }
                Err(e) => {
                    warn!(user_id = %user.id, error = %e, "Could not reconcile attending events");
                    HashSet::new()
                }
            },
        };

        Self {
            identity,
            events,
            attending_event_ids,
        }
    }
}

/// Rebuilds the session snapshot on every upstream change and distributes it
/// to subscribers.
pub struct SessionTracker {
    store: Arc<dyn AttendanceStore>,
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::empty());
        Self { store, tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub async fn set_identity(&self, identity: Identity) {
        let current = self.snapshot();
        let next = SessionSnapshot::reconciled(
            identity,
            current.events,
            &current.attending_event_ids,
            self.store.as_ref(),
        )
        .await;
        self.tx.send_replace(next);
    }

    pub async fn set_events(&self, events: Vec<Event>) {
        let current = self.snapshot();
        let next = SessionSnapshot::reconciled(
            current.identity,
            events,
            &current.attending_event_ids,
            self.store.as_ref(),
        )
        .await;
        self.tx.send_replace(next);
    }

    /// Joins an event for the signed-in user: record first, then patch the
    /// published set. Store failures propagate to the caller.
    pub async fn join(&self, event_id: Uuid) -> AppResult<()> {
        let current = self.snapshot();
        let user_id = current
            .identity
            .user()
            .ok_or_else(|| AppError::AuthError("Sign in to attend events".to_string()))?
            .id;

        self.store.join(event_id, user_id).await?;

        self.tx.send_modify(|snapshot| {
            snapshot.attending_event_ids.insert(event_id);
        });
        Ok(())
    }

    /// Leaves an event; mirror of `join`.
    pub async fn leave(&self, event_id: Uuid) -> AppResult<()> {
        let current = self.snapshot();
        let user_id = current
            .identity
            .user()
            .ok_or_else(|| AppError::AuthError("Sign in to attend events".to_string()))?
            .id;

        self.store.leave(event_id, user_id).await?;

        self.tx.send_modify(|snapshot| {
            snapshot.attending_event_ids.remove(&event_id);
        });
        Ok(())
    }
}
