//! Registration, login, and session-token verification (§6.1, §6.4).
//!
//! The HTTP surface and its auth tokens are external collaborators per
//! spec.md §1; this module is the concrete implementation that fixes the
//! contract, the way the teacher's own `user_auth` module backs its gateway.

pub mod middleware;
pub mod service;

pub use middleware::{AuthUser, require_auth};
pub use service::{AuthError, AuthService, Claims};
