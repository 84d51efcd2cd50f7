//! Unit of work for the `User` aggregate (application-level orchestration).
//!
//! ```text
//! Command
//!   ↓
//! 1. Load the user from the repository (rehydrated from its snapshot)
//!   ↓
//! 2. Run exactly one domain operation (pure, in-memory)
//!   ↓
//! 3. Save with an optimistic concurrency check on the loaded version
//!   ↓
//! 4. Drain the user's domain events into the outbox, then publish the outbox
//! ```
//!
//! Events exist only after the save succeeds. A failed operation or a failed
//! save produces nothing, and the aggregate copy is discarded.
//!
//! Once drained, envelopes stay in the outbox until the bus accepts them.
//! A bus failure never fails the commit: the committed envelopes are still
//! returned to the caller, and the outbox is retried (in commit order) on the
//! next commit or by [`CommandDispatcher::flush_outbox`].

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use thiserror::Error;

use remindr_core::{
    AggregateId, AggregateRoot, DomainError, DomainResult, ExpectedVersion, HasDomainEvents, UserId,
};
use remindr_events::{EventBus, EventEnvelope};
use remindr_users::{AGGREGATE_TYPE, User, UserEvent};

use crate::repository::{RepositoryError, UserRepository};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Domain validation failure (deterministic).
    #[error("validation failed: {0}")]
    Validation(String),
    /// Domain-level not found (unknown user, reminder or subscription).
    #[error("not found: {0}")]
    NotFound(String),
    /// The subscription's daily reminder quota is used up.
    #[error("{code}: {description}")]
    QuotaExceeded {
        code: &'static str,
        description: &'static str,
    },
    /// Domain conflict (duplicate identity, already dismissed, ...).
    #[error("conflict: {0}")]
    Conflict(String),
    /// Optimistic concurrency failure (stale aggregate version).
    #[error("concurrency conflict: {0}")]
    Concurrency(String),
    /// Persisting the aggregate failed.
    #[error(transparent)]
    Store(RepositoryError),
    /// The bus still rejects envelopes waiting in the outbox.
    #[error("event publication failed: {0}")]
    Publish(String),
}

impl From<RepositoryError> for DispatchError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Concurrency(msg) => DispatchError::Concurrency(msg),
            other => DispatchError::Store(other),
        }
    }
}

impl From<DomainError> for DispatchError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => DispatchError::Validation(msg),
            DomainError::InvalidId(msg) => DispatchError::Validation(msg),
            DomainError::NotFound(msg) => DispatchError::NotFound(msg),
            DomainError::QuotaExceeded { code, description } => {
                DispatchError::QuotaExceeded { code, description }
            }
            DomainError::Conflict(msg) => DispatchError::Conflict(msg),
        }
    }
}

/// Result of a committed unit of work: the operation's output plus the
/// envelopes committed for it (whether or not the bus has taken them yet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched<T> {
    pub output: T,
    pub events: Vec<EventEnvelope<UserEvent>>,
}

/// Reusable unit-of-work engine for the `User` aggregate.
///
/// - `R`: user repository (the transaction boundary)
/// - `B`: event bus receiving the committed events
///
/// Callers must not run two operations on the same user concurrently and
/// expect both to win: the second save fails with `DispatchError::Concurrency`
/// and should be retried by reloading.
#[derive(Debug)]
pub struct CommandDispatcher<R, B> {
    users: R,
    bus: B,
    outbox: Mutex<VecDeque<EventEnvelope<UserEvent>>>,
}

impl<R, B> CommandDispatcher<R, B> {
    pub fn new(users: R, bus: B) -> Self {
        Self {
            users,
            bus,
            outbox: Mutex::new(VecDeque::new()),
        }
    }

    pub fn users(&self) -> &R {
        &self.users
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Number of committed envelopes the bus has not accepted yet.
    pub fn undelivered(&self) -> usize {
        self.lock_outbox().len()
    }

    fn lock_outbox(&self) -> MutexGuard<'_, VecDeque<EventEnvelope<UserEvent>>> {
        // Push/pop only: a poisoned queue is still consistent.
        self.outbox.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R, B> CommandDispatcher<R, B>
where
    R: UserRepository,
    B: EventBus<EventEnvelope<UserEvent>>,
{
    /// Load a user for reading only. Nothing is saved or published.
    pub fn load(&self, user_id: UserId) -> Result<User, DispatchError> {
        self.users
            .get(user_id)?
            .ok_or_else(|| DispatchError::NotFound("User not found".to_string()))
    }

    /// Persist a brand-new user and publish whatever it recorded.
    pub fn create(&self, mut user: User) -> Result<Dispatched<UserId>, DispatchError> {
        self.users.add(&user)?;

        let events = self.commit_events(&mut user);
        Ok(Dispatched {
            output: user.id_typed(),
            events,
        })
    }

    /// Run one domain operation against a stored user.
    pub fn dispatch<T>(
        &self,
        user_id: UserId,
        operation: impl FnOnce(&mut User) -> DomainResult<T>,
    ) -> Result<Dispatched<T>, DispatchError> {
        // 1) Load
        let mut user = self.load(user_id)?;
        let loaded_version = user.version();

        // 2) Decide + mutate in memory
        let output = operation(&mut user).map_err(|err| {
            tracing::debug!(user_id = %user_id, error = %err, "user operation rejected");
            DispatchError::from(err)
        })?;

        if user.version() == loaded_version {
            return Ok(Dispatched {
                output,
                events: Vec::new(),
            });
        }

        // 3) Save (optimistic)
        self.users
            .update(&user, ExpectedVersion::Exact(loaded_version))?;

        // 4) Outbox + publish after save
        let events = self.commit_events(&mut user);
        tracing::info!(
            user_id = %user_id,
            version = user.version(),
            events = events.len(),
            "user committed"
        );

        Ok(Dispatched { output, events })
    }

    /// Publish every envelope waiting in the outbox, oldest first.
    ///
    /// Returns how many were delivered. Stops at the first rejection, leaving
    /// that envelope and everything after it queued.
    pub fn flush_outbox(&self) -> Result<usize, DispatchError> {
        let mut outbox = self.lock_outbox();
        self.publish_queued(&mut outbox)
    }

    fn commit_events(&self, user: &mut User) -> Vec<EventEnvelope<UserEvent>> {
        let aggregate_id = AggregateId::from(user.id_typed());
        let version = user.version();
        let committed_at = Utc::now();

        let envelopes: Vec<_> = user
            .take_domain_events()
            .into_iter()
            .map(|event| {
                EventEnvelope::wrap(aggregate_id, AGGREGATE_TYPE, version, committed_at, event)
            })
            .collect();

        let mut outbox = self.lock_outbox();
        outbox.extend(envelopes.iter().cloned());
        if let Err(err) = self.publish_queued(&mut outbox) {
            tracing::warn!(
                user_id = %user.id_typed(),
                undelivered = outbox.len(),
                error = %err,
                "events kept in outbox"
            );
        }

        envelopes
    }

    fn publish_queued(
        &self,
        outbox: &mut VecDeque<EventEnvelope<UserEvent>>,
    ) -> Result<usize, DispatchError> {
        let mut delivered = 0;

        while let Some(envelope) = outbox.front() {
            self.bus.publish(envelope.clone()).map_err(|e| {
                tracing::warn!(
                    event_id = %envelope.event_id(),
                    event_type = envelope.event_type(),
                    error = ?e,
                    "publishing committed event failed"
                );
                DispatchError::Publish(format!("{e:?}"))
            })?;
            outbox.pop_front();
            delivered += 1;
        }

        Ok(delivered)
    }
}
