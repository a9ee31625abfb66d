//! Session establishment.
//!
//! One `Session` is the fully-connected state every user action needs: a
//! provider, the active account, the resolved network, and the contract
//! handle. Construction either completes all four steps or fails with the
//! step that broke; there is no partially-connected state to reason
//! about.

use crate::artifact::ContractArtifact;
use crate::config::Config;
use crate::contract::Contract;
use crate::provider::Provider;
use crate::Error;
use starnotary_types::Address;
use std::sync::Arc;
use tracing::{info, warn};

/// A live connection to the deployed contract.
pub struct Session {
    pub provider: Arc<Provider>,
    /// First account the provider reported; all actions originate here.
    pub account: Address,
    pub network_id: String,
    pub contract: Contract,
}

impl Session {
    /// Connect using the artifact file named by the config.
    pub async fn establish(config: &Config) -> Result<Self, Error> {
        let artifact = ContractArtifact::from_path(&config.artifact_path)?;
        Self::establish_with(config, artifact).await
    }

    /// Connect with an already-loaded artifact.
    ///
    /// Resolution order matters: the deployment lookup happens before the
    /// account query, so an unsupported network fails fast without
    /// touching accounts.
    pub async fn establish_with(config: &Config, artifact: ContractArtifact) -> Result<Self, Error> {
        let (endpoint, is_fallback) = config.endpoint();
        if is_fallback {
            warn!(
                endpoint,
                "No injected provider configured, falling back to the local node. \
                 You should remove this fallback when you deploy live"
            );
        }
        let provider = Arc::new(Provider::new(endpoint));

        let network_id = provider.network_id().await?;
        let deployment = artifact
            .network(&network_id)
            .ok_or_else(|| Error::UnsupportedNetwork(network_id.clone()))?;
        let contract_address = deployment.address;

        let accounts = provider.accounts().await?;
        let account = accounts.first().copied().ok_or(Error::NoAccounts)?;

        let contract = Contract::new(Arc::clone(&provider), contract_address, &artifact.abi)?;
        info!(
            network = %network_id,
            contract = %contract.address(),
            account = %account,
            "Session established"
        );

        Ok(Self { provider, account, network_id, contract })
    }
}
