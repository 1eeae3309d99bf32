//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a verified JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires `user_metadata.is_admin` on the token.

pub mod auth;
pub mod rbac;
