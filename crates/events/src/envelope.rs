use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use remindr_core::AggregateId;

use crate::DomainEvent;

/// Envelope for an event, containing aggregate + commit metadata.
///
/// This is the unit published on the event bus once the owning aggregate has
/// been saved.
///
/// Notes:
/// - `sequence_number` is the aggregate version the event was committed with;
///   several events drained from one commit share it and keep their order in
///   the publish sequence.
/// - `occurred_at` is the commit time, not the time the aggregate method ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    aggregate_id: AggregateId,
    aggregate_type: String,

    sequence_number: u64,

    event_type: String,
    occurred_at: DateTime<Utc>,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        event_type: impl Into<String>,
        occurred_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            sequence_number,
            event_type: event_type.into(),
            occurred_at,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: DomainEvent> EventEnvelope<E> {
    /// Wrap a freshly committed domain event (new event id, `event_type` taken
    /// from the payload).
    pub fn wrap(
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        occurred_at: DateTime<Utc>,
        payload: E,
    ) -> Self {
        let event_type = payload.event_type();
        Self::new(
            Uuid::now_v7(),
            aggregate_id,
            aggregate_type,
            sequence_number,
            event_type,
            occurred_at,
            payload,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Pinged;

    impl DomainEvent for Pinged {
        fn event_type(&self) -> &'static str {
            "test.pinged"
        }

        fn version(&self) -> u32 {
            1
        }
    }

    #[test]
    fn wrap_copies_event_type_from_payload() {
        let aggregate_id = AggregateId::new();
        let env = EventEnvelope::wrap(aggregate_id, "test", 7, Utc::now(), Pinged);

        assert_eq!(env.event_type(), "test.pinged");
        assert_eq!(env.aggregate_id(), aggregate_id);
        assert_eq!(env.aggregate_type(), "test");
        assert_eq!(env.sequence_number(), 7);
        assert_eq!(env.into_payload(), Pinged);
    }
}
