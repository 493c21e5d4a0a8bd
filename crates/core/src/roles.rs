//! Well-known role name constants.
//!
//! The admin panel has a single shared password, so there is only one role.
//! It is embedded in session tokens and checked by the `RequireAdmin`
//! extractor.

pub const ROLE_ADMIN: &str = "admin";
