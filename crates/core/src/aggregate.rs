//! Aggregate root trait and the unit-of-work contracts around it.

use crate::error::{DomainError, DomainResult};

/// Aggregate root marker + minimal interface.
///
/// Aggregates are loaded, mutated once per unit of work and saved. They never
/// perform IO; side effects are described by the domain events they record.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per successful mutation; repositories compare it
    /// against the stored version for optimistic concurrency.
    fn version(&self) -> u64;
}

/// Aggregates that accumulate domain events while being mutated.
///
/// Events stay buffered on the aggregate until the unit of work has saved it,
/// then they are drained exactly once with [`take_domain_events`].
///
/// [`take_domain_events`]: HasDomainEvents::take_domain_events
pub trait HasDomainEvents {
    type Event: Clone + core::fmt::Debug;

    /// Events recorded since the last drain, oldest first.
    fn pending_events(&self) -> &[Self::Event];

    /// Drain the buffered events, leaving the buffer empty.
    fn take_domain_events(&mut self) -> Vec<Self::Event>;
}

/// Optimistic concurrency expectation for an aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking (useful for idempotent commands, migrations, etc.).
    Any,
    /// Require the aggregate to be at an exact version.
    Exact(u64),
}

impl ExpectedVersion {
    pub fn matches(self, actual: u64) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: u64) -> DomainResult<()> {
        if self.matches(actual) {
            Ok(())
        } else {
            Err(DomainError::conflict(format!(
                "optimistic concurrency check failed (expected: {self:?}, actual: {actual})"
            )))
        }
    }
}
