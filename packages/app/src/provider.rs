//! JSON-RPC provider transport.
//!
//! A thin JSON-RPC 2.0 client over HTTP covering exactly the provider
//! surface the front end consumes: network identification, account
//! listing, read-only and state-changing contract calls, and log
//! filters. No retries, no failover, no timeouts beyond the HTTP
//! client's defaults.

use crate::Error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use starnotary_types::Address;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle to a JSON-RPC endpoint.
pub struct Provider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

/// Read-only call parameters (`eth_call`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallObject {
    pub to: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    pub data: String,
}

/// State-changing call parameters (`eth_sendTransaction`). The node holds
/// the keys; the request only names the originating account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionObject {
    pub from: Address,
    pub to: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub data: String,
}

/// Log filter installation parameters (`eth_newFilter`). `topics` entries
/// are 32-byte hex strings, `None` meaning wildcard at that position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub address: Address,
    pub topics: Vec<Option<String>>,
    pub from_block: String,
}

/// A log delivered through a filter poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<String>,
    pub data: String,
    pub block_number: String,
    pub transaction_hash: String,
    pub log_index: String,
}

impl LogEntry {
    /// A topic as raw bytes, `None` when absent or malformed.
    pub fn topic(&self, index: usize) -> Option<[u8; 32]> {
        let raw = self.topics.get(index)?;
        let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).ok()?;
        bytes.try_into().ok()
    }

    /// The non-indexed event payload as raw bytes.
    pub fn data_bytes(&self) -> Vec<u8> {
        hex::decode(self.data.strip_prefix("0x").unwrap_or(&self.data)).unwrap_or_default()
    }
}

impl Provider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Network identifier as reported by the node (`net_version`).
    pub async fn network_id(&self) -> Result<String, Error> {
        self.request("net_version", json!([])).await
    }

    /// Accounts the provider is willing to sign for (`eth_accounts`).
    pub async fn accounts(&self) -> Result<Vec<Address>, Error> {
        self.request("eth_accounts", json!([])).await
    }

    /// Current balance of an account in wei (`eth_getBalance`).
    pub async fn balance(&self, address: &Address) -> Result<u128, Error> {
        let raw: String = self.request("eth_getBalance", json!([address, "latest"])).await?;
        parse_quantity(&raw)
    }

    /// Read-only contract call; returns the raw return data.
    pub async fn call(&self, call: &CallObject) -> Result<Vec<u8>, Error> {
        let raw: String = self.request("eth_call", json!([call, "latest"])).await?;
        decode_hex_bytes(&raw)
    }

    /// State-changing contract call; returns the transaction hash.
    pub async fn send_transaction(&self, tx: &TransactionObject) -> Result<String, Error> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    /// Install a log filter; returns the filter id.
    pub async fn new_filter(&self, filter: &FilterOptions) -> Result<String, Error> {
        self.request("eth_newFilter", json!([filter])).await
    }

    /// Logs delivered since the previous poll of this filter.
    pub async fn filter_changes(&self, filter_id: &str) -> Result<Vec<LogEntry>, Error> {
        self.request("eth_getFilterChanges", json!([filter_id])).await
    }

    /// Remove a filter server-side.
    pub async fn uninstall_filter(&self, filter_id: &str) -> Result<bool, Error> {
        self.request("eth_uninstallFilter", json!([filter_id])).await
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &'static str,
        params: Value,
    ) -> Result<R, Error> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Rpc(format!("{method} transport failed: {e}")))?;

        let envelope: RpcEnvelope = response
            .json()
            .await
            .map_err(|e| Error::Rpc(format!("{method} returned a malformed response: {e}")))?;

        if let Some(error) = envelope.error {
            return Err(Error::Rpc(error.message));
        }
        let result = envelope
            .result
            .ok_or_else(|| Error::Rpc(format!("{method} returned no result")))?;
        serde_json::from_value(result)
            .map_err(|e| Error::Rpc(format!("{method} result did not deserialize: {e}")))
    }
}

#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    #[allow(dead_code)]
    code: i64,
    message: String,
}

/// Encode raw bytes as a `0x`-prefixed hex string.
pub fn encode_hex_bytes(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

fn decode_hex_bytes(raw: &str) -> Result<Vec<u8>, Error> {
    hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
        .map_err(|e| Error::Rpc(format!("bad hex data {raw}: {e}")))
}

fn parse_quantity(raw: &str) -> Result<u128, Error> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u128::from_str_radix(digits, 16).map_err(|e| Error::Rpc(format!("bad quantity {raw}: {e}")))
}
