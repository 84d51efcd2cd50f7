use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use remindr_core::{ReminderId, UserId};
use remindr_users::Reminder;

use super::RepositoryError;

/// Persistence port for reminders (owned outside the `User` aggregate).
pub trait ReminderRepository: Send + Sync {
    fn get(&self, id: ReminderId) -> Result<Option<Reminder>, RepositoryError>;

    fn add(&self, reminder: Reminder) -> Result<(), RepositoryError>;

    fn update(&self, reminder: Reminder) -> Result<(), RepositoryError>;

    /// Remove a reminder; returns whether it existed.
    fn remove(&self, id: ReminderId) -> Result<bool, RepositoryError>;

    /// All reminders of a user, ordered by date/time.
    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, RepositoryError>;
}

impl<R> ReminderRepository for Arc<R>
where
    R: ReminderRepository + ?Sized,
{
    fn get(&self, id: ReminderId) -> Result<Option<Reminder>, RepositoryError> {
        (**self).get(id)
    }

    fn add(&self, reminder: Reminder) -> Result<(), RepositoryError> {
        (**self).add(reminder)
    }

    fn update(&self, reminder: Reminder) -> Result<(), RepositoryError> {
        (**self).update(reminder)
    }

    fn remove(&self, id: ReminderId) -> Result<bool, RepositoryError> {
        (**self).remove(id)
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, RepositoryError> {
        (**self).list_for_user(user_id)
    }
}

/// In-memory reminder store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryReminderRepository {
    reminders: RwLock<HashMap<ReminderId, Reminder>>,
}

impl InMemoryReminderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReminderRepository for InMemoryReminderRepository {
    fn get(&self, id: ReminderId) -> Result<Option<Reminder>, RepositoryError> {
        let reminders = self.reminders.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(reminders.get(&id).cloned())
    }

    fn add(&self, reminder: Reminder) -> Result<(), RepositoryError> {
        let mut reminders = self.reminders.write().map_err(|_| RepositoryError::Poisoned)?;

        let id = reminder.id_typed();
        if reminders.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists(format!("reminder {id}")));
        }
        reminders.insert(id, reminder);
        Ok(())
    }

    fn update(&self, reminder: Reminder) -> Result<(), RepositoryError> {
        let mut reminders = self.reminders.write().map_err(|_| RepositoryError::Poisoned)?;

        let id = reminder.id_typed();
        match reminders.get_mut(&id) {
            Some(slot) => {
                *slot = reminder;
                Ok(())
            }
            None => Err(RepositoryError::NotFound(format!("reminder {id}"))),
        }
    }

    fn remove(&self, id: ReminderId) -> Result<bool, RepositoryError> {
        let mut reminders = self.reminders.write().map_err(|_| RepositoryError::Poisoned)?;
        Ok(reminders.remove(&id).is_some())
    }

    fn list_for_user(&self, user_id: UserId) -> Result<Vec<Reminder>, RepositoryError> {
        let reminders = self.reminders.read().map_err(|_| RepositoryError::Poisoned)?;

        let mut owned: Vec<Reminder> = reminders
            .values()
            .filter(|r| r.user_id() == user_id)
            .cloned()
            .collect();
        owned.sort_by_key(|r| (r.date_time(), r.id_typed()));
        Ok(owned)
    }
}
