use serde::{Deserialize, Serialize};

use remindr_core::UserId;

use crate::{Permission, Role};

/// The authenticated caller, as resolved by the hosting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub permissions: Vec<Permission>,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn new(id: UserId, permissions: Vec<Permission>, roles: Vec<Role>) -> Self {
        Self {
            id,
            permissions,
            roles,
        }
    }

    pub fn has_permission(&self, required: &Permission) -> bool {
        self.permissions
            .iter()
            .any(|p| p.is_wildcard() || p == required)
    }

    pub fn has_role(&self, required: &Role) -> bool {
        self.roles.contains(required)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }
}
