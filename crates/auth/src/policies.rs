use serde::{Deserialize, Serialize};

use remindr_core::UserId;

use crate::CurrentUser;

/// Named authorization policy evaluated against the request's target user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// The caller acts on their own data, or holds the admin role.
    SelfOrAdmin,
}

impl Policy {
    pub fn is_satisfied_by(self, current_user: &CurrentUser, target_user_id: UserId) -> bool {
        match self {
            Policy::SelfOrAdmin => current_user.id == target_user_id || current_user.is_admin(),
        }
    }
}

impl core::fmt::Display for Policy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Policy::SelfOrAdmin => write!(f, "SelfOrAdmin"),
        }
    }
}
