//! `remindr-auth`: pure authorization boundary.
//!
//! Decoupled from transport and storage: callers resolve a `CurrentUser` and
//! check it against a request's requirements before the request reaches any
//! aggregate.

pub mod authorize;
pub mod current_user;
pub mod permissions;
pub mod policies;
pub mod roles;

pub use authorize::{AuthorizationRequirements, AuthzError, authorize};
pub use current_user::CurrentUser;
pub use permissions::Permission;
pub use policies::Policy;
pub use roles::Role;
