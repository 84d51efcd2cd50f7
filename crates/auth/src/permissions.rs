use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are modeled as opaque strings (e.g. "subscription.get").
/// A special wildcard permission `"*"` can be used by policy layers to indicate
/// "allow all" without hardcoding domain permissions into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const SUBSCRIPTION_CREATE: Permission = Permission::from_static("subscription.create");
    pub const SUBSCRIPTION_GET: Permission = Permission::from_static("subscription.get");
    pub const SUBSCRIPTION_DELETE: Permission = Permission::from_static("subscription.delete");

    pub const REMINDER_SET: Permission = Permission::from_static("reminder.set");
    pub const REMINDER_GET: Permission = Permission::from_static("reminder.get");
    pub const REMINDER_DISMISS: Permission = Permission::from_static("reminder.dismiss");
    pub const REMINDER_DELETE: Permission = Permission::from_static("reminder.delete");

    pub const WILDCARD: Permission = Permission::from_static("*");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Every permission the application knows about.
    pub fn catalog() -> Vec<Permission> {
        vec![
            Self::SUBSCRIPTION_CREATE,
            Self::SUBSCRIPTION_GET,
            Self::SUBSCRIPTION_DELETE,
            Self::REMINDER_SET,
            Self::REMINDER_GET,
            Self::REMINDER_DISMISS,
            Self::REMINDER_DELETE,
        ]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
