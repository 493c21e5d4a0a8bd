//! Admin session primitives.
//!
//! - [`password`] -- comparison against the configured admin password.
//! - [`jwt`] -- session token generation and validation.
//! - [`session`] -- the session cookie and token lookup in request headers.

pub mod jwt;
pub mod password;
pub mod session;
