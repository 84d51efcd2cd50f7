//! Users domain module: reminders and subscriptions.
//!
//! The `User` aggregate owns the per-day reminder bookkeeping (`Calendar`) and
//! the current `Subscription`, and is the only place the daily quota and the
//! cancellation rules are enforced. Pure domain logic: no IO, no clocks, no
//! storage.

pub mod calendar;
pub mod errors;
pub mod events;
pub mod reminder;
pub mod subscription;
pub mod user;

pub use calendar::Calendar;
pub use events::{ReminderDeleted, ReminderDismissed, ReminderSet, SubscriptionDeleted, UserEvent};
pub use reminder::Reminder;
pub use subscription::{Subscription, SubscriptionType};
pub use user::{User, UserSnapshot, AGGREGATE_TYPE};
