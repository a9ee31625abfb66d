//! JSON-RPC 2.0 surface.
//!
//! One POST route dispatching on the method name. Only the calls the
//! front end makes are implemented; unknown methods get the standard
//! -32601 error object. Contract reverts surface as -32000 errors with a
//! ganache-style `VM Exception` message carrying the reason.

use crate::chain::{Chain, FilterCriteria, FromBlock, StoredLog, TxError};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use starnotary_types::Address;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub struct NodeState {
    pub chain: Mutex<Chain>,
}

pub fn create_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/", post(rpc))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

async fn rpc(State(state): State<Arc<NodeState>>, Json(request): Json<RpcRequest>) -> Json<RpcResponse> {
    let outcome = dispatch(&state, &request.method, &request.params);
    let response = match outcome {
        Ok(result) => RpcResponse {
            jsonrpc: "2.0",
            id: request.id,
            result: Some(result),
            error: None,
        },
        Err((code, message)) => {
            debug!(method = %request.method, code, %message, "rpc error");
            RpcResponse {
                jsonrpc: "2.0",
                id: request.id,
                result: None,
                error: Some(RpcError { code, message }),
            }
        }
    };
    Json(response)
}

fn dispatch(state: &NodeState, method: &str, params: &Value) -> Result<Value, (i64, String)> {
    let mut chain = state.chain.lock().unwrap_or_else(|e| e.into_inner());
    match method {
        "net_version" => Ok(json!(chain.network_id())),
        "eth_accounts" => {
            let accounts = chain.accounts().map_err(server_error)?;
            Ok(json!(accounts))
        }
        "eth_getBalance" => {
            let address: Address = param(params, 0)?;
            Ok(json!(quantity(chain.balance(&address))))
        }
        "eth_call" => {
            let call: CallObject = param(params, 0)?;
            let data = parse_data(call.data.as_deref().unwrap_or("0x"))?;
            let returned = chain
                .call(call.from.unwrap_or(Address::ZERO), call.to, &data)
                .map_err(revert_error)?;
            Ok(json!(data_hex(&returned)))
        }
        "eth_sendTransaction" => {
            let tx: TransactionObject = param(params, 0)?;
            let value = match tx.value.as_deref() {
                Some(raw) => parse_quantity(raw)?,
                None => 0,
            };
            let data = parse_data(tx.data.as_deref().unwrap_or("0x"))?;
            let hash = chain
                .send_transaction(tx.from, tx.to, value, &data)
                .map_err(|e| match e {
                    TxError::Rejected(message) => server_error(message),
                    TxError::Reverted(reason) => revert_error(reason),
                })?;
            Ok(json!(hash))
        }
        "eth_newFilter" => {
            let filter: FilterObject = param(params, 0)?;
            let mut topics = Vec::new();
            for topic in filter.topics.unwrap_or_default() {
                topics.push(match topic {
                    Some(raw) => Some(parse_topic(&raw)?),
                    None => None,
                });
            }
            let from_block = match filter.from_block.as_deref() {
                None | Some("latest") | Some("pending") => FromBlock::Latest,
                Some("earliest") => FromBlock::Number(0),
                Some(raw) => FromBlock::Number(
                    parse_quantity(raw)?
                        .try_into()
                        .map_err(|_| invalid_params("fromBlock out of range".to_string()))?,
                ),
            };
            let id = chain.new_filter(
                FilterCriteria { address: filter.address, topics },
                from_block,
            );
            Ok(json!(format!("0x{id:x}")))
        }
        "eth_getFilterChanges" => {
            let raw: String = param(params, 0)?;
            let id = parse_filter_id(&raw)?;
            let logs = chain
                .filter_changes(id)
                .ok_or_else(|| server_error("filter not found".to_string()))?;
            let wire: Vec<WireLog> = logs.into_iter().map(WireLog::from).collect();
            Ok(json!(wire))
        }
        "eth_uninstallFilter" => {
            let raw: String = param(params, 0)?;
            let id = parse_filter_id(&raw)?;
            Ok(json!(chain.uninstall_filter(id)))
        }
        other => Err((
            -32601,
            format!("the method {other} does not exist/is not available"),
        )),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CallObject {
    to: Address,
    #[serde(default)]
    from: Option<Address>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionObject {
    from: Address,
    to: Address,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterObject {
    #[serde(default)]
    address: Option<Address>,
    #[serde(default)]
    topics: Option<Vec<Option<String>>>,
    #[serde(default)]
    from_block: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireLog {
    address: Address,
    topics: Vec<String>,
    data: String,
    block_number: String,
    transaction_hash: String,
    log_index: String,
}

impl From<StoredLog> for WireLog {
    fn from(log: StoredLog) -> Self {
        Self {
            address: log.address,
            topics: log.topics.iter().map(|t| format!("0x{}", hex::encode(t))).collect(),
            data: data_hex(&log.data),
            block_number: format!("0x{:x}", log.block_number),
            transaction_hash: log.transaction_hash,
            log_index: format!("0x{:x}", log.log_index),
        }
    }
}

fn param<T: serde::de::DeserializeOwned>(params: &Value, index: usize) -> Result<T, (i64, String)> {
    let item = params
        .get(index)
        .cloned()
        .ok_or_else(|| invalid_params(format!("missing parameter {index}")))?;
    serde_json::from_value(item).map_err(|e| invalid_params(e.to_string()))
}

fn invalid_params(message: String) -> (i64, String) {
    (-32602, format!("invalid params: {message}"))
}

fn server_error(message: String) -> (i64, String) {
    (-32000, message)
}

fn revert_error(reason: String) -> (i64, String) {
    (-32000, format!("VM Exception while processing transaction: revert {reason}"))
}

fn quantity(value: u128) -> String {
    format!("0x{value:x}")
}

fn parse_quantity(raw: &str) -> Result<u128, (i64, String)> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u128::from_str_radix(digits, 16).map_err(|e| invalid_params(format!("bad quantity {raw}: {e}")))
}

fn parse_filter_id(raw: &str) -> Result<u64, (i64, String)> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| invalid_params(format!("bad filter id {raw}: {e}")))
}

fn parse_data(raw: &str) -> Result<Vec<u8>, (i64, String)> {
    hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
        .map_err(|e| invalid_params(format!("bad hex data: {e}")))
}

fn parse_topic(raw: &str) -> Result<[u8; 32], (i64, String)> {
    let bytes = parse_data(raw)?;
    bytes
        .try_into()
        .map_err(|_| invalid_params("topic must be 32 bytes".to_string()))
}

fn data_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}
