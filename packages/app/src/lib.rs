//! # Star Notary front end
//!
//! A thin client for a deployed star-notary token contract. Connects to a
//! wallet/node JSON-RPC endpoint (with a fixed local fallback), resolves
//! the deployed contract address for the current network from a static
//! artifact, and exposes three user actions: create a star, look one up,
//! and react to incoming transfer events.
//!
//! ## Quick Start
//! ```bash
//! cargo run --bin starnotary
//! ```
//!
//! All chain-side invariants (id uniqueness, ownership) live in the
//! contract; this crate only relays calls and renders their outcomes.

pub mod actions;
pub mod artifact;
pub mod config;
mod contract;
mod error;
pub mod events;
pub mod provider;
mod session;
mod status;

pub use artifact::ContractArtifact;
pub use config::Config;
pub use contract::Contract;
pub use error::Error;
pub use events::TransferSubscription;
pub use provider::Provider;
pub use session::Session;
pub use status::{ConsoleStatus, MemoryStatus, StatusSink};
