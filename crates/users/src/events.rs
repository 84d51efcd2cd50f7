use serde::{Deserialize, Serialize};

use remindr_core::{ReminderId, SubscriptionId, UserId};
use remindr_events::DomainEvent;

use crate::Reminder;

/// Event: ReminderSet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSet {
    pub user_id: UserId,
    pub reminder: Reminder,
}

/// Event: ReminderDismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDismissed {
    pub user_id: UserId,
    pub reminder_id: ReminderId,
}

/// Event: ReminderDeleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderDeleted {
    pub user_id: UserId,
    pub reminder_id: ReminderId,
}

/// Event: SubscriptionDeleted.
///
/// Carries the id of the subscription that was active before cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDeleted {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserEvent {
    ReminderSet(ReminderSet),
    ReminderDismissed(ReminderDismissed),
    ReminderDeleted(ReminderDeleted),
    SubscriptionDeleted(SubscriptionDeleted),
}

impl UserEvent {
    pub fn user_id(&self) -> UserId {
        match self {
            UserEvent::ReminderSet(e) => e.user_id,
            UserEvent::ReminderDismissed(e) => e.user_id,
            UserEvent::ReminderDeleted(e) => e.user_id,
            UserEvent::SubscriptionDeleted(e) => e.user_id,
        }
    }
}

impl DomainEvent for UserEvent {
    fn event_type(&self) -> &'static str {
        match self {
            UserEvent::ReminderSet(_) => "users.reminder.set",
            UserEvent::ReminderDismissed(_) => "users.reminder.dismissed",
            UserEvent::ReminderDeleted(_) => "users.reminder.deleted",
            UserEvent::SubscriptionDeleted(_) => "users.subscription.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}
