//! Admin password check.
//!
//! The service has a single shared admin password read from the environment.
//! Both sides are reduced to SHA-256 digests before comparison so the
//! comparison time does not depend on where the inputs first differ.

use sha2::{Digest, Sha256};

/// Whether `candidate` equals the configured admin password.
pub fn verify_admin_password(candidate: &str, expected: &str) -> bool {
    let a = Sha256::digest(candidate.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
