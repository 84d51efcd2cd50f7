use crate::EventEnvelope;

/// Reacts to committed domain events (event consumer abstraction).
///
/// Handlers run after the producing aggregate has been saved and its events
/// published. Delivery is at-least-once, so handlers must tolerate seeing the
/// same envelope twice.
pub trait EventHandler<E> {
    type Error: core::fmt::Debug;

    fn handle(&self, envelope: &EventEnvelope<E>) -> Result<(), Self::Error>;
}
