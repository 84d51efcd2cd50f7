/// A domain event recorded by an aggregate.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - drained from the aggregate once, after the unit of work commits
///
/// Business time is stamped on the [`EventEnvelope`](crate::EventEnvelope) at
/// commit, so aggregates stay free of clocks.
pub trait DomainEvent: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "users.reminder.set").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;
}
