use serde::{Deserialize, Serialize};

use remindr_core::{SubscriptionId, ValueObject};

/// Subscription tier, ordered by increasing daily reminder allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionType {
    Basic,
    Pro,
}

impl SubscriptionType {
    pub const ALL: [SubscriptionType; 2] = [SubscriptionType::Basic, SubscriptionType::Pro];

    /// Maximum number of reminders a user may schedule on a single day.
    ///
    /// `Pro` is unlimited in practice; the calendar's counter range is the only
    /// bound left.
    pub fn max_daily_reminders(self) -> u32 {
        match self {
            SubscriptionType::Basic => 3,
            SubscriptionType::Pro => u32::MAX,
        }
    }
}

impl core::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SubscriptionType::Basic => write!(f, "Basic"),
            SubscriptionType::Pro => write!(f, "Pro"),
        }
    }
}

/// A user's subscription.
///
/// `Canceled` is a sentinel with no identity of its own: any two canceled
/// subscriptions compare equal, and a canceled subscription never matches a
/// subscription id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Subscription {
    Active {
        id: SubscriptionId,
        subscription_type: SubscriptionType,
    },
    Canceled,
}

impl Subscription {
    pub fn new(id: SubscriptionId, subscription_type: SubscriptionType) -> Self {
        Subscription::Active {
            id,
            subscription_type,
        }
    }

    pub fn id(&self) -> Option<SubscriptionId> {
        match self {
            Subscription::Active { id, .. } => Some(*id),
            Subscription::Canceled => None,
        }
    }

    pub fn subscription_type(&self) -> Option<SubscriptionType> {
        match self {
            Subscription::Active {
                subscription_type, ..
            } => Some(*subscription_type),
            Subscription::Canceled => None,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Subscription::Canceled)
    }

    /// Daily reminder cap; a canceled subscription allows none.
    pub fn max_daily_reminders(&self) -> u32 {
        self.subscription_type()
            .map(SubscriptionType::max_daily_reminders)
            .unwrap_or(0)
    }
}

impl ValueObject for Subscription {}
