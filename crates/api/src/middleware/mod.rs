//! Authorization extractors.
//!
//! - [`auth::RequireAdmin`] -- Requires a valid admin session.

pub mod auth;
