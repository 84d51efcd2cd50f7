use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use remindr_auth::{AuthorizationRequirements, authorize};
use remindr_core::{DomainError, ReminderId, SubscriptionId, UserId};
use remindr_events::{EventBus, EventEnvelope, EventHandler, Subscription as BusSubscription};
use remindr_infra::{CommandDispatcher, ReminderRepository, UserRepository};
use remindr_users::{Reminder, Subscription, User, UserEvent};

use crate::context::CurrentUserProvider;
use crate::error::AppError;
use crate::handlers::{ReminderStoreHandler, SubscriptionCleanupHandler};
use crate::requests::{
    CancelSubscription, CreateSubscription, DeleteReminder, DismissReminder, GetReminder,
    GetSubscription, ListReminders, SetReminder, SubscriptionView,
};

/// Entry point for every command and query.
///
/// Each request is authorized against the current user before any repository
/// is touched. Commands run as one unit of work on the target user; the events
/// they commit are published on the bus and then consumed in-process.
///
/// Committed events are queued before they are consumed and leave the queue
/// only once every consumer has handled them. A consumer failure surfaces as
/// the command's error and the event stays queued for the next command or
/// [`Application::deliver_pending`].
pub struct Application<P, B> {
    current_user: P,
    dispatcher: CommandDispatcher<Arc<dyn UserRepository>, B>,
    reminders: Arc<dyn ReminderRepository>,
    reminder_store: ReminderStoreHandler,
    pending: Mutex<VecDeque<EventEnvelope<UserEvent>>>,
}

impl<P, B> Application<P, B>
where
    P: CurrentUserProvider,
    B: EventBus<EventEnvelope<UserEvent>>,
{
    pub fn new(
        current_user: P,
        users: Arc<dyn UserRepository>,
        reminders: Arc<dyn ReminderRepository>,
        bus: B,
    ) -> Self {
        Self {
            current_user,
            dispatcher: CommandDispatcher::new(users, bus),
            reminder_store: ReminderStoreHandler::new(reminders.clone()),
            reminders,
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Retry everything committed but not yet delivered: events waiting for
    /// the in-process consumers, then envelopes waiting for the bus.
    pub fn deliver_pending(&self) -> Result<(), AppError> {
        self.consume(Vec::new())?;
        self.dispatcher.flush_outbox()?;
        Ok(())
    }

    /// Committed events not yet handled by the in-process consumers.
    pub fn pending_events(&self) -> usize {
        self.lock_pending().len()
    }

    /// Subscribe to every user event committed from now on.
    pub fn subscribe(&self) -> BusSubscription<EventEnvelope<UserEvent>> {
        self.dispatcher.bus().subscribe()
    }

    pub fn create_subscription(
        &self,
        command: &CreateSubscription,
    ) -> Result<SubscriptionView, AppError> {
        self.authorize(command)?;

        if self.dispatcher.users().get(command.user_id)?.is_some() {
            return Err(DomainError::conflict(format!(
                "user {} already has a subscription",
                command.user_id
            ))
            .into());
        }

        let subscription_id = SubscriptionId::new();
        let user = User::new(
            command.user_id,
            Subscription::new(subscription_id, command.subscription_type),
            None,
        );
        let dispatched = self.dispatcher.create(user)?;
        self.consume(dispatched.events)?;

        Ok(SubscriptionView {
            id: subscription_id,
            user_id: command.user_id,
            subscription_type: command.subscription_type,
        })
    }

    pub fn get_subscription(&self, query: &GetSubscription) -> Result<SubscriptionView, AppError> {
        self.authorize(query)?;

        let user = self.dispatcher.load(query.user_id)?;
        match *user.subscription() {
            Subscription::Active {
                id,
                subscription_type,
            } => Ok(SubscriptionView {
                id,
                user_id: query.user_id,
                subscription_type,
            }),
            Subscription::Canceled => Err(AppError::not_found("Subscription not found")),
        }
    }

    pub fn cancel_subscription(&self, command: &CancelSubscription) -> Result<(), AppError> {
        self.authorize(command)?;

        let dispatched = self.dispatcher.dispatch(command.user_id, |user| {
            user.cancel_subscription(command.subscription_id)
        })?;
        self.consume(dispatched.events)
    }

    pub fn set_reminder(&self, command: &SetReminder) -> Result<Reminder, AppError> {
        self.authorize(command)?;

        let reminder = Reminder::new(
            ReminderId::new(),
            command.user_id,
            command.subscription_id,
            command.text.clone(),
            command.date_time,
        )?;

        let dispatched = self.dispatcher.dispatch(command.user_id, |user| {
            let active = user.subscription().id();
            if active.is_some() && active != Some(command.subscription_id) {
                return Err(DomainError::not_found("Subscription not found"));
            }
            user.set_reminder(&reminder)
        })?;
        self.consume(dispatched.events)?;

        Ok(reminder)
    }

    pub fn get_reminder(&self, query: &GetReminder) -> Result<Reminder, AppError> {
        self.authorize(query)?;
        self.owned_reminder(query.user_id, query.reminder_id)
    }

    pub fn list_reminders(&self, query: &ListReminders) -> Result<Vec<Reminder>, AppError> {
        self.authorize(query)?;
        Ok(self.reminders.list_for_user(query.user_id)?)
    }

    pub fn dismiss_reminder(&self, command: &DismissReminder) -> Result<(), AppError> {
        self.authorize(command)?;

        let dispatched = self
            .dispatcher
            .dispatch(command.user_id, |user| user.dismiss_reminder(command.reminder_id))?;
        self.consume(dispatched.events)
    }

    pub fn delete_reminder(&self, command: &DeleteReminder) -> Result<(), AppError> {
        self.authorize(command)?;

        let reminder = self.owned_reminder(command.user_id, command.reminder_id)?;
        let dispatched = self
            .dispatcher
            .dispatch(command.user_id, |user| user.delete_reminder(&reminder))?;
        self.consume(dispatched.events)
    }

    fn authorize<R>(&self, request: &R) -> Result<(), AppError>
    where
        R: AuthorizationRequirements,
    {
        let current_user = self.current_user.current_user();
        authorize(&current_user, request)?;
        Ok(())
    }

    fn owned_reminder(
        &self,
        user_id: UserId,
        reminder_id: ReminderId,
    ) -> Result<Reminder, AppError> {
        self.reminders
            .get(reminder_id)?
            .filter(|r| r.user_id() == user_id)
            .ok_or_else(|| AppError::not_found("Reminder not found"))
    }

    fn lock_pending(&self) -> MutexGuard<'_, VecDeque<EventEnvelope<UserEvent>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the in-process consumers over queued and newly committed events,
    /// including the events their own follow-up commits produce.
    ///
    /// An event is dequeued only after every consumer has handled it; the
    /// consumers tolerate seeing it again on retry.
    fn consume(&self, events: Vec<EventEnvelope<UserEvent>>) -> Result<(), AppError> {
        let cleanup = SubscriptionCleanupHandler::new(&self.dispatcher);
        let mut pending = self.lock_pending();
        pending.extend(events);

        while let Some(envelope) = pending.front() {
            let handled = self
                .reminder_store
                .handle(envelope)
                .map_err(AppError::from)
                .and_then(|()| cleanup.handle(envelope).map_err(AppError::from));

            let follow_up = match handled {
                Ok(follow_up) => follow_up,
                Err(err) => {
                    tracing::warn!(
                        event_id = %envelope.event_id(),
                        event_type = envelope.event_type(),
                        pending = pending.len(),
                        error = %err,
                        "event consumer failed; event kept for retry"
                    );
                    return Err(err);
                }
            };

            pending.pop_front();
            pending.extend(follow_up);
        }

        Ok(())
    }
}
