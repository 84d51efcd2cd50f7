//! Commands and queries accepted by the [`Application`](crate::Application).
//!
//! Every request names the user it acts on and declares what the caller needs
//! to be allowed to send it.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use remindr_auth::{AuthorizationRequirements, Permission, Policy};
use remindr_core::{ReminderId, SubscriptionId, UserId};
use remindr_users::SubscriptionType;

static SELF_OR_ADMIN: [Policy; 1] = [Policy::SelfOrAdmin];

static SUBSCRIPTION_CREATE: [Permission; 1] = [Permission::SUBSCRIPTION_CREATE];
static SUBSCRIPTION_GET: [Permission; 1] = [Permission::SUBSCRIPTION_GET];
static SUBSCRIPTION_DELETE: [Permission; 1] = [Permission::SUBSCRIPTION_DELETE];
static REMINDER_SET: [Permission; 1] = [Permission::REMINDER_SET];
static REMINDER_GET: [Permission; 1] = [Permission::REMINDER_GET];
static REMINDER_DISMISS: [Permission; 1] = [Permission::REMINDER_DISMISS];
static REMINDER_DELETE: [Permission; 1] = [Permission::REMINDER_DELETE];

macro_rules! requires {
    ($request:ty, $permissions:ident) => {
        impl AuthorizationRequirements for $request {
            fn target_user_id(&self) -> UserId {
                self.user_id
            }

            fn required_permissions(&self) -> &[Permission] {
                &$permissions
            }

            fn required_policies(&self) -> &[Policy] {
                &SELF_OR_ADMIN
            }
        }
    };
}

/// Command: subscribe a user (creating the user on first subscription).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSubscription {
    pub user_id: UserId,
    pub subscription_type: SubscriptionType,
}

/// Query: the user's active subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetSubscription {
    pub user_id: UserId,
}

/// Command: cancel the user's active subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelSubscription {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

/// Command: schedule a new reminder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetReminder {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
    pub text: String,
    pub date_time: DateTime<FixedOffset>,
}

/// Query: a single reminder of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetReminder {
    pub user_id: UserId,
    pub reminder_id: ReminderId,
}

/// Query: all reminders of the user, by date/time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReminders {
    pub user_id: UserId,
}

/// Command: dismiss a reminder (its calendar slot stays used).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DismissReminder {
    pub user_id: UserId,
    pub reminder_id: ReminderId,
}

/// Command: delete a reminder (its calendar slot is freed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReminder {
    pub user_id: UserId,
    pub reminder_id: ReminderId,
}

requires!(CreateSubscription, SUBSCRIPTION_CREATE);
requires!(GetSubscription, SUBSCRIPTION_GET);
requires!(CancelSubscription, SUBSCRIPTION_DELETE);
requires!(SetReminder, REMINDER_SET);
requires!(GetReminder, REMINDER_GET);
requires!(ListReminders, REMINDER_GET);
requires!(DismissReminder, REMINDER_DISMISS);
requires!(DeleteReminder, REMINDER_DELETE);

/// Read model returned by subscription requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionView {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub subscription_type: SubscriptionType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_request_is_self_or_admin() {
        let user_id = UserId::new();
        let get = GetSubscription { user_id };
        let cancel = CancelSubscription {
            user_id,
            subscription_id: SubscriptionId::new(),
        };

        assert_eq!(get.target_user_id(), user_id);
        assert_eq!(get.required_policies(), &[Policy::SelfOrAdmin]);
        assert_eq!(cancel.required_policies(), &[Policy::SelfOrAdmin]);
    }

    #[test]
    fn reads_and_writes_need_distinct_permissions() {
        let user_id = UserId::new();
        let list = ListReminders { user_id };
        let delete = DeleteReminder {
            user_id,
            reminder_id: ReminderId::new(),
        };

        assert_eq!(list.required_permissions(), &[Permission::REMINDER_GET]);
        assert_eq!(delete.required_permissions(), &[Permission::REMINDER_DELETE]);
    }
}
