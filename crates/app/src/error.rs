use thiserror::Error;

use remindr_auth::AuthzError;
use remindr_core::DomainError;
use remindr_infra::{DispatchError, RepositoryError};

/// Coarse error category, for hosts mapping errors onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthorized,
    NotFound,
    Validation,
    Conflict,
    Unexpected,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthorized(_) => ErrorKind::Unauthorized,
            AppError::Dispatch(err) => match err {
                DispatchError::NotFound(_) => ErrorKind::NotFound,
                DispatchError::Validation(_) | DispatchError::QuotaExceeded { .. } => {
                    ErrorKind::Validation
                }
                DispatchError::Conflict(_) | DispatchError::Concurrency(_) => ErrorKind::Conflict,
                DispatchError::Store(_) | DispatchError::Publish(_) => ErrorKind::Unexpected,
            },
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::Dispatch(DispatchError::NotFound(msg.into()))
    }
}

impl From<DomainError> for AppError {
    fn from(value: DomainError) -> Self {
        AppError::Dispatch(value.into())
    }
}

impl From<RepositoryError> for AppError {
    fn from(value: RepositoryError) -> Self {
        AppError::Dispatch(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remindr_auth::Policy;

    #[test]
    fn authorization_failures_are_unauthorized() {
        let err = AppError::from(AuthzError::PolicyFailed(Policy::SelfOrAdmin));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn quota_is_a_validation_failure() {
        let err = AppError::from(DomainError::QuotaExceeded {
            code: "User.CannotCreateMoreRemindersThanSubscriptionAllows",
            description: "Cannot create more reminders than subscription allows",
        });
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn stale_writes_are_conflicts() {
        let err = AppError::from(RepositoryError::Concurrency("stale".to_string()));
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }
}
