//! Clientgen Core - control logic for the clientgen operator console
//!
//! This crate holds everything the console needs to watch and drive a
//! clientgen engine over its REST API, with zero presentation dependencies.
//! A front end plugs in by implementing the traits in [`ports`] and feeding
//! operator commands into a [`controller::Controller`].

pub mod backend;
pub mod chart;
pub mod config_sync;
pub mod controller;
pub mod error;
pub mod logging;
pub mod models;
pub mod notify;
pub mod poller;
pub mod ports;
pub mod settings;
pub mod toggle;
pub mod transfer;

pub use controller::{Controller, Event};
pub use error::{BackendError, TransferError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
