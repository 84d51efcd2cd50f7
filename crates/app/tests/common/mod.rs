#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset};

use remindr_app::{CurrentUserProvider, InMemoryApplication, bootstrap};
use remindr_auth::{CurrentUser, Permission, Role};
use remindr_core::UserId;
use remindr_infra::AppConfig;
use remindr_observability::{LogFormat, LoggingConfig};

/// Provider whose answer can be swapped between requests.
#[derive(Debug)]
pub struct TestCurrentUserProvider {
    current: Mutex<CurrentUser>,
}

impl TestCurrentUserProvider {
    pub fn new(user: CurrentUser) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(user),
        })
    }

    pub fn returns(&self, user: CurrentUser) {
        *self.current.lock().unwrap() = user;
    }
}

impl CurrentUserProvider for TestCurrentUserProvider {
    fn current_user(&self) -> CurrentUser {
        self.current.lock().unwrap().clone()
    }
}

/// Builds callers; by default a regular user holding every permission.
pub struct CurrentUserFactory {
    id: UserId,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
}

impl CurrentUserFactory {
    pub fn new() -> Self {
        Self {
            id: UserId::new(),
            permissions: Permission::catalog(),
            roles: Vec::new(),
        }
    }

    pub fn id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    pub fn permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    pub fn build(self) -> CurrentUser {
        CurrentUser::new(self.id, self.permissions, self.roles)
    }
}

pub fn app_for(
    user: CurrentUser,
) -> (
    InMemoryApplication<Arc<TestCurrentUserProvider>>,
    Arc<TestCurrentUserProvider>,
) {
    let provider = TestCurrentUserProvider::new(user);
    let config = AppConfig {
        logging: LoggingConfig {
            filter: "warn".to_string(),
            format: LogFormat::Pretty,
        },
    };
    let app = bootstrap(&config, provider.clone());
    (app, provider)
}

pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}
