//! # Star Notary mock node
//!
//! An in-memory development chain with the notary contract pre-deployed,
//! behind the JSON-RPC surface the front end speaks. Insta-mining, fixed
//! funded accounts, no gas accounting. Runs standalone as
//! `starnotary-node` or embedded in a test process via [`spawn`].

mod chain;
mod notary;
mod rpc;

use chain::Chain;
use rpc::NodeState;
use serde::Deserialize;
use starnotary_types::Address;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Address the notary contract is deployed at, shared with the contract
/// artifact's network map.
pub const CONTRACT_ADDRESS: [u8; 20] = [
    0x46, 0xbc, 0x9a, 0xc0, 0x96, 0xc1, 0x13, 0xb1, 0x67, 0xc3, 0xf1, 0xbb, 0xcf, 0x66, 0xb8,
    0xa6, 0x16, 0x04, 0xea, 0x4a,
];

pub fn contract_address() -> Address {
    Address::from(CONTRACT_ADDRESS)
}

/// Node configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MockNodeConfig {
    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Network id reported by `net_version`.
    #[serde(default = "defaults::network_id")]
    pub network_id: String,

    /// Number of funded dev accounts to derive.
    #[serde(default = "defaults::accounts")]
    pub accounts: usize,

    #[serde(default = "defaults::token_name")]
    pub token_name: String,

    #[serde(default = "defaults::token_symbol")]
    pub token_symbol: String,

    /// Deny `eth_accounts`, for exercising clients against a provider
    /// that grants no account access.
    #[serde(default)]
    pub fail_accounts: bool,
}

impl Default for MockNodeConfig {
    fn default() -> Self {
        Self {
            bind_address: defaults::bind_address(),
            network_id: defaults::network_id(),
            accounts: defaults::accounts(),
            token_name: defaults::token_name(),
            token_symbol: defaults::token_symbol(),
            fail_accounts: false,
        }
    }
}

mod defaults {
    pub fn bind_address() -> String {
        "127.0.0.1:8545".into()
    }

    pub fn network_id() -> String {
        "5777".into()
    }

    pub fn accounts() -> usize {
        10
    }

    pub fn token_name() -> String {
        "Star Notary".into()
    }

    pub fn token_symbol() -> String {
        "STAR".into()
    }
}

/// A running node. Shuts down when told to or when dropped.
pub struct NodeHandle {
    addr: SocketAddr,
    contract_address: Address,
    network_id: String,
    accounts: Vec<Address>,
    cancel: CancellationToken,
}

impl NodeHandle {
    /// HTTP endpoint the node is serving on.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    /// The funded dev accounts, in derivation order.
    pub fn accounts(&self) -> &[Address] {
        &self.accounts
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for NodeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Bind and start serving. Binding to port 0 picks a free port; the
/// chosen address is available through the returned handle.
pub async fn spawn(config: MockNodeConfig) -> std::io::Result<NodeHandle> {
    let contract = contract_address();
    let chain = Chain::new(&config, contract);
    let accounts = chain.account_list().to_vec();
    let state = Arc::new(NodeState { chain: Mutex::new(chain) });
    let router = rpc::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    let addr = listener.local_addr()?;
    let cancel = CancellationToken::new();
    let shutdown = cancel.clone().cancelled_owned();
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).with_graceful_shutdown(shutdown).await {
            error!(error = %e, "mock node server error");
        }
    });

    info!(
        address = %addr,
        network = %config.network_id,
        contract = %contract,
        "Mock node listening"
    );

    Ok(NodeHandle {
        addr,
        contract_address: contract,
        network_id: config.network_id,
        accounts,
        cancel,
    })
}
