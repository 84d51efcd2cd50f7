//! Business-rule failures raised by the `User` aggregate.

use remindr_core::{DomainError, ReminderId};

pub const CANNOT_CREATE_MORE_REMINDERS_THAN_SUBSCRIPTION_ALLOWS: &str =
    "User.CannotCreateMoreRemindersThanSubscriptionAllows";

pub fn cannot_create_more_reminders_than_subscription_allows() -> DomainError {
    DomainError::QuotaExceeded {
        code: CANNOT_CREATE_MORE_REMINDERS_THAN_SUBSCRIPTION_ALLOWS,
        description: "Cannot create more reminders than subscription allows",
    }
}

pub fn subscription_not_found() -> DomainError {
    DomainError::not_found("Subscription not found")
}

pub fn reminder_not_found() -> DomainError {
    DomainError::not_found("Reminder not found")
}

pub fn reminder_already_set(id: ReminderId) -> DomainError {
    DomainError::conflict(format!("reminder {id} is already set"))
}
