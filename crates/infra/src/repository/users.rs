use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value as JsonValue;

use remindr_core::{AggregateRoot, ExpectedVersion, UserId};
use remindr_users::{User, UserSnapshot};

use super::RepositoryError;

/// Persistence port for the `User` aggregate.
///
/// Users are stored without their pending events; the unit of work drains
/// and publishes those after `add`/`update` succeed.
pub trait UserRepository: Send + Sync {
    fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    fn add(&self, user: &User) -> Result<(), RepositoryError>;

    /// Replace the stored user, failing if the stored version does not match
    /// `expected_version`.
    fn update(&self, user: &User, expected_version: ExpectedVersion)
    -> Result<(), RepositoryError>;
}

impl<R> UserRepository for Arc<R>
where
    R: UserRepository + ?Sized,
{
    fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        (**self).get(id)
    }

    fn add(&self, user: &User) -> Result<(), RepositoryError> {
        (**self).add(user)
    }

    fn update(
        &self,
        user: &User,
        expected_version: ExpectedVersion,
    ) -> Result<(), RepositoryError> {
        (**self).update(user, expected_version)
    }
}

/// In-memory user store.
///
/// Users are kept as serialized snapshots so every load goes through
/// `User::rehydrate`, exactly like a database-backed mapper would.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, JsonValue>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn encode(user: &User) -> Result<JsonValue, RepositoryError> {
        serde_json::to_value(user.snapshot())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }

    fn decode(raw: &JsonValue) -> Result<UserSnapshot, RepositoryError> {
        serde_json::from_value(raw.clone())
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }
}

impl UserRepository for InMemoryUserRepository {
    fn get(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().map_err(|_| RepositoryError::Poisoned)?;

        users
            .get(&id)
            .map(|raw| Self::decode(raw).map(User::rehydrate))
            .transpose()
    }

    fn add(&self, user: &User) -> Result<(), RepositoryError> {
        let encoded = Self::encode(user)?;
        let mut users = self.users.write().map_err(|_| RepositoryError::Poisoned)?;

        let id = user.id_typed();
        if users.contains_key(&id) {
            return Err(RepositoryError::AlreadyExists(format!("user {id}")));
        }
        users.insert(id, encoded);

        tracing::debug!(user_id = %id, version = user.version(), "user added");
        Ok(())
    }

    fn update(
        &self,
        user: &User,
        expected_version: ExpectedVersion,
    ) -> Result<(), RepositoryError> {
        let encoded = Self::encode(user)?;
        let mut users = self.users.write().map_err(|_| RepositoryError::Poisoned)?;

        let id = user.id_typed();
        let stored = users
            .get(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("user {id}")))?;
        let current = Self::decode(stored)?.version;

        if !expected_version.matches(current) {
            return Err(RepositoryError::Concurrency(format!(
                "user {id}: expected {expected_version:?}, found {current}"
            )));
        }
        users.insert(id, encoded);

        tracing::debug!(user_id = %id, from = current, to = user.version(), "user updated");
        Ok(())
    }
}
