use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use remindr_core::{
    AggregateRoot, DomainResult, HasDomainEvents, ReminderId, SubscriptionId, UserId,
};

use crate::errors;
use crate::events::{
    ReminderDeleted, ReminderDismissed, ReminderSet, SubscriptionDeleted, UserEvent,
};
use crate::{Calendar, Reminder, Subscription};

/// Aggregate type name used on event envelopes.
pub const AGGREGATE_TYPE: &str = "users.user";

/// Aggregate root: User.
///
/// # Invariants
/// - The number of reminders counted on any calendar day never exceeds the
///   subscription tier's daily maximum, nor the counter's range.
/// - A reminder id is tracked at most once.
/// - A canceled subscription accepts neither new reminders nor dismissals.
/// - A failed operation leaves the aggregate untouched (checks run before any
///   mutation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    subscription: Subscription,
    calendar: Calendar,
    reminder_ids: Vec<ReminderId>,
    pending_events: Vec<UserEvent>,
    version: u64,
}

/// Persisted form of a [`User`].
///
/// Pending domain events are deliberately absent: they are drained and
/// published by the unit of work, never stored with the aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    pub subscription: Subscription,
    pub calendar: Calendar,
    pub reminder_ids: Vec<ReminderId>,
    pub version: u64,
}

impl User {
    pub fn new(id: UserId, subscription: Subscription, calendar: Option<Calendar>) -> Self {
        Self {
            id,
            subscription,
            calendar: calendar.unwrap_or_default(),
            reminder_ids: Vec::new(),
            pending_events: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a user from its persisted form.
    ///
    /// For repositories only: state is trusted as stored and no events are
    /// recorded.
    pub fn rehydrate(snapshot: UserSnapshot) -> Self {
        Self {
            id: snapshot.id,
            subscription: snapshot.subscription,
            calendar: snapshot.calendar,
            reminder_ids: snapshot.reminder_ids,
            pending_events: Vec::new(),
            version: snapshot.version,
        }
    }

    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            subscription: self.subscription,
            calendar: self.calendar.clone(),
            reminder_ids: self.reminder_ids.clone(),
            version: self.version,
        }
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn reminder_ids(&self) -> &[ReminderId] {
        &self.reminder_ids
    }

    pub fn has_reminder(&self, reminder_id: ReminderId) -> bool {
        self.reminder_ids.contains(&reminder_id)
    }

    pub fn set_reminder(&mut self, reminder: &Reminder) -> DomainResult<()> {
        if self.subscription.is_canceled() {
            tracing::debug!(user_id = %self.id, "set_reminder rejected: subscription canceled");
            return Err(errors::subscription_not_found());
        }

        let reminder_id = reminder.id_typed();
        if self.has_reminder(reminder_id) {
            return Err(errors::reminder_already_set(reminder_id));
        }

        if self.has_reached_daily_reminder_limit(reminder.date()) {
            tracing::debug!(
                user_id = %self.id,
                date = %reminder.date(),
                limit = self.subscription.max_daily_reminders(),
                "set_reminder rejected: daily limit reached"
            );
            return Err(errors::cannot_create_more_reminders_than_subscription_allows());
        }

        self.calendar.increment_event_count(reminder.date());
        self.reminder_ids.push(reminder_id);
        self.record(UserEvent::ReminderSet(ReminderSet {
            user_id: self.id,
            reminder: reminder.clone(),
        }));

        Ok(())
    }

    /// Stop tracking a reminder without freeing its calendar slot.
    ///
    /// The day's count is kept, so dismissing does not make room for another
    /// reminder on the same day (unlike [`User::delete_reminder`]).
    pub fn dismiss_reminder(&mut self, reminder_id: ReminderId) -> DomainResult<()> {
        if self.subscription.is_canceled() {
            tracing::debug!(user_id = %self.id, "dismiss_reminder rejected: subscription canceled");
            return Err(errors::subscription_not_found());
        }

        if !self.remove_reminder_id(reminder_id) {
            return Err(errors::reminder_not_found());
        }

        self.record(UserEvent::ReminderDismissed(ReminderDismissed {
            user_id: self.id,
            reminder_id,
        }));

        Ok(())
    }

    /// Replace the active subscription with `Subscription::Canceled`.
    ///
    /// Fails with `NotFound` when `subscription_id` is not the active
    /// subscription's id, which includes every call on an already canceled
    /// subscription.
    pub fn cancel_subscription(&mut self, subscription_id: SubscriptionId) -> DomainResult<()> {
        if self.subscription.id() != Some(subscription_id) {
            return Err(errors::subscription_not_found());
        }

        self.subscription = Subscription::Canceled;
        self.record(UserEvent::SubscriptionDeleted(SubscriptionDeleted {
            user_id: self.id,
            subscription_id,
        }));

        Ok(())
    }

    /// Stop tracking a reminder and free its calendar slot.
    ///
    /// Allowed on a canceled subscription so stale reminders can be cleaned up.
    pub fn delete_reminder(&mut self, reminder: &Reminder) -> DomainResult<()> {
        let reminder_id = reminder.id_typed();
        if !self.remove_reminder_id(reminder_id) {
            return Err(errors::reminder_not_found());
        }

        self.calendar.decrement_event_count(reminder.date());
        self.record(UserEvent::ReminderDeleted(ReminderDeleted {
            user_id: self.id,
            reminder_id,
        }));

        Ok(())
    }

    /// Delete every tracked reminder, one `ReminderDeleted` event each.
    ///
    /// The calendar is left as is: only the ids are known here, not the days
    /// their reminders were counted on.
    pub fn delete_all_reminders(&mut self) {
        if self.reminder_ids.is_empty() {
            return;
        }

        let deleted = std::mem::take(&mut self.reminder_ids);
        tracing::info!(user_id = %self.id, count = deleted.len(), "deleting all reminders");

        let user_id = self.id;
        self.pending_events.extend(deleted.into_iter().map(|reminder_id| {
            UserEvent::ReminderDeleted(ReminderDeleted {
                user_id,
                reminder_id,
            })
        }));
        self.version += 1;
    }

    fn has_reached_daily_reminder_limit(&self, date: NaiveDate) -> bool {
        let daily_reminder_count = self.calendar.num_events_on_day(date);

        daily_reminder_count >= self.subscription.max_daily_reminders()
            || daily_reminder_count == u32::MAX
    }

    fn remove_reminder_id(&mut self, reminder_id: ReminderId) -> bool {
        match self.reminder_ids.iter().position(|id| *id == reminder_id) {
            Some(idx) => {
                self.reminder_ids.remove(idx);
                true
            }
            None => false,
        }
    }

    fn record(&mut self, event: UserEvent) {
        tracing::info!(
            user_id = %self.id,
            event_type = remindr_events::DomainEvent::event_type(&event),
            "user event recorded"
        );
        self.pending_events.push(event);
        self.version += 1;
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl HasDomainEvents for User {
    type Event = UserEvent;

    fn pending_events(&self) -> &[Self::Event] {
        &self.pending_events
    }

    fn take_domain_events(&mut self) -> Vec<Self::Event> {
        std::mem::take(&mut self.pending_events)
    }
}
