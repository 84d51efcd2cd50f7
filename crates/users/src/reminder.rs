use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use remindr_core::{DomainError, DomainResult, Entity, ReminderId, SubscriptionId, UserId};

/// A reminder scheduled by a user.
///
/// Reminders are created and stored outside the `User` aggregate; the user
/// only tracks their ids and the per-day counts on its calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    id: ReminderId,
    user_id: UserId,
    subscription_id: SubscriptionId,
    text: String,
    date_time: DateTime<FixedOffset>,
    is_dismissed: bool,
}

impl Reminder {
    pub fn new(
        id: ReminderId,
        user_id: UserId,
        subscription_id: SubscriptionId,
        text: impl Into<String>,
        date_time: DateTime<FixedOffset>,
    ) -> DomainResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::validation("reminder text cannot be empty"));
        }

        Ok(Self {
            id,
            user_id,
            subscription_id,
            text,
            date_time,
            is_dismissed: false,
        })
    }

    pub fn id_typed(&self) -> ReminderId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn date_time(&self) -> DateTime<FixedOffset> {
        self.date_time
    }

    /// Calendar day of the reminder, in the reminder's own UTC offset.
    pub fn date(&self) -> NaiveDate {
        self.date_time.date_naive()
    }

    pub fn is_dismissed(&self) -> bool {
        self.is_dismissed
    }

    pub fn dismiss(&mut self) -> DomainResult<()> {
        if self.is_dismissed {
            return Err(DomainError::conflict("reminder is already dismissed"));
        }
        self.is_dismissed = true;
        Ok(())
    }
}

impl Entity for Reminder {
    type Id = ReminderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder_at(rfc3339: &str) -> Reminder {
        Reminder::new(
            ReminderId::new(),
            UserId::new(),
            SubscriptionId::new(),
            "water the plants",
            DateTime::parse_from_rfc3339(rfc3339).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn date_truncates_in_the_reminders_offset() {
        // 23:30 at UTC-05:00 is already the next day in UTC.
        let reminder = reminder_at("2024-06-01T23:30:00-05:00");

        assert_eq!(reminder.date(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn new_rejects_blank_text() {
        let err = Reminder::new(
            ReminderId::new(),
            UserId::new(),
            SubscriptionId::new(),
            "  ",
            DateTime::parse_from_rfc3339("2024-06-01T08:00:00Z").unwrap(),
        )
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn dismiss_only_once() {
        let mut reminder = reminder_at("2024-06-01T08:00:00Z");
        assert!(!reminder.is_dismissed());

        reminder.dismiss().unwrap();
        assert!(reminder.is_dismissed());

        let err = reminder.dismiss().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn identity_ignores_state() {
        let reminder = reminder_at("2024-06-01T08:00:00Z");
        let mut dismissed = reminder.clone();
        dismissed.dismiss().unwrap();

        assert_ne!(reminder, dismissed);
        assert!(reminder.same_identity_as(&dismissed));
    }
}
