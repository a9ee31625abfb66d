//! Front-end configuration.

use serde::Deserialize;

/// Configuration for the front end.
///
/// `rpc_url` is the wallet/node endpoint the user has pointed us at; when
/// it is absent the client falls back to the fixed local node, which is a
/// development convenience and should not survive a live deployment.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rpc_url: Option<String>,

    #[serde(default = "defaults::fallback_rpc_url")]
    pub fallback_rpc_url: String,

    #[serde(default = "defaults::artifact_path")]
    pub artifact_path: String,

    #[serde(default = "defaults::event_poll_ms")]
    pub event_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: None,
            fallback_rpc_url: defaults::fallback_rpc_url(),
            artifact_path: defaults::artifact_path(),
            event_poll_ms: defaults::event_poll_ms(),
        }
    }
}

impl Config {
    /// The endpoint bootstrap should use: the configured wallet/node URL
    /// when present and non-empty, the local fallback otherwise.
    pub fn endpoint(&self) -> (&str, bool) {
        match self.rpc_url.as_deref() {
            Some(url) if !url.is_empty() => (url, false),
            _ => (&self.fallback_rpc_url, true),
        }
    }
}

mod defaults {
    pub fn fallback_rpc_url() -> String {
        "http://127.0.0.1:8545".into()
    }

    pub fn artifact_path() -> String {
        "deployments/StarNotary.json".into()
    }

    pub fn event_poll_ms() -> u64 {
        1000
    }
}
