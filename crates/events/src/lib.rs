//! `remindr-events`: domain event contracts and in-process distribution.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::DomainEvent;
pub use handler::EventHandler;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
