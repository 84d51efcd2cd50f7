//! Process wiring: logging, in-memory stores and the event bus.

use std::sync::Arc;

use anyhow::Context;

use remindr_events::{EventEnvelope, InMemoryEventBus};
use remindr_infra::{
    AppConfig, InMemoryReminderRepository, InMemoryUserRepository, ReminderRepository,
    UserRepository,
};
use remindr_users::UserEvent;

use crate::application::Application;
use crate::context::CurrentUserProvider;

pub type UserEventBus = InMemoryEventBus<EventEnvelope<UserEvent>>;

/// The application wired entirely in memory.
pub type InMemoryApplication<P> = Application<P, Arc<UserEventBus>>;

/// Initialize logging and wire an [`InMemoryApplication`] from `config`.
pub fn bootstrap<P>(config: &AppConfig, current_user: P) -> InMemoryApplication<P>
where
    P: CurrentUserProvider,
{
    remindr_observability::init(&config.logging);

    let users: Arc<dyn UserRepository> = Arc::new(InMemoryUserRepository::new());
    let reminders: Arc<dyn ReminderRepository> = Arc::new(InMemoryReminderRepository::new());
    let bus = Arc::new(UserEventBus::new());

    tracing::info!(
        log_filter = %config.logging.filter,
        log_format = ?config.logging.format,
        "application wired with in-memory stores"
    );

    Application::new(current_user, users, reminders, bus)
}

/// Same as [`bootstrap`], reading the configuration from the environment.
pub fn bootstrap_from_env<P>(current_user: P) -> anyhow::Result<InMemoryApplication<P>>
where
    P: CurrentUserProvider,
{
    let config = AppConfig::from_env().context("loading configuration from environment")?;
    Ok(bootstrap(&config, current_user))
}
