//! `remindr-app`, the application layer: authorized commands/queries over the
//! `User` aggregate, plus the in-process consumers of its domain events.
//!
//! There is no transport here; hosts resolve a [`CurrentUser`] through a
//! [`CurrentUserProvider`] and call [`Application`] directly.
//!
//! [`CurrentUser`]: remindr_auth::CurrentUser

pub mod application;
pub mod bootstrap;
pub mod context;
pub mod error;
pub mod handlers;
pub mod requests;

pub use application::Application;
pub use bootstrap::{InMemoryApplication, bootstrap, bootstrap_from_env};
pub use context::{CurrentUserProvider, FixedCurrentUser};
pub use error::{AppError, ErrorKind};
pub use requests::{
    CancelSubscription, CreateSubscription, DeleteReminder, DismissReminder, GetReminder,
    GetSubscription, ListReminders, SetReminder, SubscriptionView,
};
