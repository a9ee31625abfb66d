//! Error types for the front end.

use starnotary_types::CodecError;
use std::fmt;

/// Front-end error type.
///
/// Bootstrap failures are surfaced to the caller as variants rather than
/// swallowed; user actions translate these into fixed status messages at
/// the display boundary.
#[derive(Debug)]
pub enum Error {
    /// Configuration or artifact loading error.
    Config(String),
    /// Transport failure or an RPC error object; revert reasons from the
    /// node ride in this message verbatim.
    Rpc(String),
    /// Call data or return data did not match the contract descriptor.
    Codec(String),
    /// The artifact has no deployment entry for the connected network.
    UnsupportedNetwork(String),
    /// The provider returned an empty account list.
    NoAccounts,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "config error: {msg}"),
            Error::Rpc(msg) => write!(f, "rpc error: {msg}"),
            Error::Codec(msg) => write!(f, "codec error: {msg}"),
            Error::UnsupportedNetwork(id) => {
                write!(f, "no deployment found for network {id}")
            }
            Error::NoAccounts => write!(f, "provider returned no accounts"),
        }
    }
}

impl std::error::Error for Error {}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Error::Codec(e.to_string())
    }
}
