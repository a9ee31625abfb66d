//! Shared types and pure-logic utilities for the Star Notary workspace.
//! No I/O and no async, so the client, the mock node, and tests can all
//! depend on it.

pub mod abi;
mod address;
mod error;

pub use address::Address;
pub use error::CodecError;
