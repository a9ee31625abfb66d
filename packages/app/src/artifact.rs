//! Compiled-contract artifact loading.
//!
//! The build pipeline emits one JSON artifact per contract carrying the
//! ABI and a map of network id to deployed address. Only the fields the
//! front end consumes are modeled; everything else in the artifact is
//! ignored.

use crate::Error;
use serde::Deserialize;
use starnotary_types::Address;
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed contract artifact.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    #[serde(default)]
    pub contract_name: String,
    pub abi: Vec<AbiEntry>,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkDeployment>,
}

/// Per-network deployment record.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkDeployment {
    pub address: Address,
}

/// One ABI item (function, event, or constructor).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<AbiParam>,
    #[serde(default)]
    pub outputs: Vec<AbiParam>,
    #[serde(default)]
    pub state_mutability: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
}

/// One ABI parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct AbiParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub indexed: bool,
}

impl ContractArtifact {
    /// Load and parse an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read artifact {}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse artifact {}: {e}", path.display())))
    }

    /// Parse an artifact from an already-loaded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        serde_json::from_value(value)
            .map_err(|e| Error::Config(format!("failed to parse artifact: {e}")))
    }

    /// Deployment record for a network id, if the contract is deployed there.
    pub fn network(&self, network_id: &str) -> Option<&NetworkDeployment> {
        self.networks.get(network_id)
    }
}
