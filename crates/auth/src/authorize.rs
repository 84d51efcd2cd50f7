use thiserror::Error;

use remindr_core::UserId;

use crate::{CurrentUser, Permission, Policy, Role};

/// Every variant means the caller is unauthorized; the variant says why.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("unauthorized: missing permission '{0}'")]
    MissingPermission(String),

    #[error("unauthorized: missing role '{0}'")]
    MissingRole(String),

    #[error("unauthorized: policy '{0}' not satisfied")]
    PolicyFailed(Policy),
}

/// Request-side authorization contract (checked before dispatch).
///
/// Implement this on commands and queries. The hosting layer enforces the
/// requirements before the request reaches a repository or aggregate.
pub trait AuthorizationRequirements {
    /// The user whose data the request reads or mutates.
    fn target_user_id(&self) -> UserId;

    fn required_permissions(&self) -> &[Permission] {
        &[]
    }

    fn required_roles(&self) -> &[Role] {
        &[]
    }

    fn required_policies(&self) -> &[Policy] {
        &[]
    }
}

/// Authorize the current user for a request.
///
/// Permissions are checked first, then roles, then policies; the first unmet
/// requirement is reported.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize<R>(current_user: &CurrentUser, request: &R) -> Result<(), AuthzError>
where
    R: AuthorizationRequirements + ?Sized,
{
    if let Some(missing) = request
        .required_permissions()
        .iter()
        .find(|p| !current_user.has_permission(p))
    {
        tracing::debug!(user_id = %current_user.id, permission = %missing, "authorization denied");
        return Err(AuthzError::MissingPermission(missing.as_str().to_string()));
    }

    if let Some(missing) = request
        .required_roles()
        .iter()
        .find(|r| !current_user.has_role(r))
    {
        tracing::debug!(user_id = %current_user.id, role = %missing, "authorization denied");
        return Err(AuthzError::MissingRole(missing.as_str().to_string()));
    }

    let target = request.target_user_id();
    if let Some(failed) = request
        .required_policies()
        .iter()
        .find(|policy| !policy.is_satisfied_by(current_user, target))
    {
        tracing::debug!(
            user_id = %current_user.id,
            target_user_id = %target,
            policy = %failed,
            "authorization denied"
        );
        return Err(AuthzError::PolicyFailed(*failed));
    }

    Ok(())
}
