use std::sync::Arc;

use remindr_auth::CurrentUser;

/// Resolves the authenticated caller for the request being handled.
pub trait CurrentUserProvider: Send + Sync {
    fn current_user(&self) -> CurrentUser;
}

impl<P> CurrentUserProvider for Arc<P>
where
    P: CurrentUserProvider + ?Sized,
{
    fn current_user(&self) -> CurrentUser {
        (**self).current_user()
    }
}

/// Provider that always answers with the same user.
#[derive(Debug, Clone)]
pub struct FixedCurrentUser(pub CurrentUser);

impl CurrentUserProvider for FixedCurrentUser {
    fn current_user(&self) -> CurrentUser {
        self.0.clone()
    }
}
