//! Infrastructure layer: configuration, repositories, unit of work.

pub mod command_dispatcher;
pub mod config;
pub mod repository;

pub use command_dispatcher::{CommandDispatcher, DispatchError, Dispatched};
pub use config::{AppConfig, ConfigError};
pub use repository::{
    InMemoryReminderRepository, InMemoryUserRepository, ReminderRepository, RepositoryError,
    UserRepository,
};
