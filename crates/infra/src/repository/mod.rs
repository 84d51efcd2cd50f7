//! Storage boundary for users and reminders.
//!
//! Only in-memory implementations live here; they are the unit-of-work
//! boundary used by the application layer and its tests.

pub mod reminders;
pub mod users;

use thiserror::Error;

pub use reminders::{InMemoryReminderRepository, ReminderRepository};
pub use users::{InMemoryUserRepository, UserRepository};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("storage lock poisoned")]
    Poisoned,
}
