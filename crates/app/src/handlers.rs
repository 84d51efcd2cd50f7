//! In-process consumers of committed user events.
//!
//! - `ReminderSet` stores the new reminder.
//! - `ReminderDismissed` marks the stored reminder dismissed.
//! - `ReminderDeleted` removes the stored reminder.
//! - `SubscriptionDeleted` deletes all of the user's reminders, which in turn
//!   commits one `ReminderDeleted` per reminder.
//!
//! Every handler tolerates redelivery.

use std::sync::Arc;

use remindr_events::{EventBus, EventEnvelope, EventHandler};
use remindr_infra::{
    CommandDispatcher, DispatchError, ReminderRepository, RepositoryError, UserRepository,
};
use remindr_users::UserEvent;

/// Keeps the reminder store in line with the user's reminder events.
#[derive(Clone)]
pub struct ReminderStoreHandler {
    reminders: Arc<dyn ReminderRepository>,
}

impl ReminderStoreHandler {
    pub fn new(reminders: Arc<dyn ReminderRepository>) -> Self {
        Self { reminders }
    }
}

impl EventHandler<UserEvent> for ReminderStoreHandler {
    type Error = RepositoryError;

    fn handle(&self, envelope: &EventEnvelope<UserEvent>) -> Result<(), Self::Error> {
        match envelope.payload() {
            UserEvent::ReminderSet(e) => match self.reminders.add(e.reminder.clone()) {
                Ok(()) | Err(RepositoryError::AlreadyExists(_)) => Ok(()),
                Err(other) => Err(other),
            },
            UserEvent::ReminderDismissed(e) => {
                let Some(mut reminder) = self.reminders.get(e.reminder_id)? else {
                    tracing::warn!(reminder_id = %e.reminder_id, "dismissed reminder not in store");
                    return Ok(());
                };
                if reminder.dismiss().is_err() {
                    // Already dismissed: redelivery.
                    return Ok(());
                }
                self.reminders.update(reminder)
            }
            UserEvent::ReminderDeleted(e) => {
                self.reminders.remove(e.reminder_id)?;
                Ok(())
            }
            UserEvent::SubscriptionDeleted(_) => Ok(()),
        }
    }
}

/// Deletes every reminder of a user whose subscription was canceled.
pub struct SubscriptionCleanupHandler<'a, R, B> {
    dispatcher: &'a CommandDispatcher<R, B>,
}

impl<'a, R, B> SubscriptionCleanupHandler<'a, R, B>
where
    R: UserRepository,
    B: EventBus<EventEnvelope<UserEvent>>,
{
    pub fn new(dispatcher: &'a CommandDispatcher<R, B>) -> Self {
        Self { dispatcher }
    }

    /// Handle one envelope, returning the events committed as a consequence.
    pub fn handle(
        &self,
        envelope: &EventEnvelope<UserEvent>,
    ) -> Result<Vec<EventEnvelope<UserEvent>>, DispatchError> {
        let UserEvent::SubscriptionDeleted(e) = envelope.payload() else {
            return Ok(Vec::new());
        };

        tracing::info!(
            user_id = %e.user_id,
            subscription_id = %e.subscription_id,
            "subscription canceled; deleting reminders"
        );
        let dispatched = self.dispatcher.dispatch(e.user_id, |user| {
            user.delete_all_reminders();
            Ok(())
        })?;

        Ok(dispatched.events)
    }
}
