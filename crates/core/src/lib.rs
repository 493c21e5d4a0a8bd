//! Domain types and rules shared by the NomNomChow crates.
//!
//! Nothing in here talks to the database or the network; the batch
//! controller only needs tokio timers.

pub mod batch;
pub mod draft;
pub mod error;
pub mod meal;
pub mod prompts;
pub mod roles;
pub mod types;
