//! Background work spawned from request handlers.
//!
//! Each submodule wires a [`nomnomchow_core::batch`] run to its concrete
//! collaborators. Runs are detached `tokio::spawn` tasks whose progress is
//! read back through [`crate::state::AppState::batch`].

pub mod batch_images;
