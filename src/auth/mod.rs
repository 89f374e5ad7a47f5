//! Access guard for admin-only routes.
//!
//! Bearer tokens are HS256 JWTs carrying the principal's id. The guard
//! verifies the token, loads the principal from the `users` collection and
//! checks the admin flag:
//!
//! ```ignore
//! let principal = guard.authenticate(&headers).await?;
//! let admin = guard.require_admin(principal)?;
//! ```
//!
//! Users are provisioned out of band with `showroom user add`; there is no
//! login endpoint.

mod audit;
mod error;
mod guard;
mod token;
mod users;

pub use audit::{AuditEvent, log_audit_event};
pub use error::AuthError;
pub use guard::AccessGuard;
pub use token::{Claims, Tokens};
pub use users::{NewUser, Principal, User, UserDirectory};
