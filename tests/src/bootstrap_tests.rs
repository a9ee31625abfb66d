// =============================================================================
// Bootstrap Tests
// =============================================================================
// Session establishment against a live node: endpoint selection, network
// resolution from the artifact, and account binding.

use crate::utils::{artifact_path, connect, load_artifact, node_config, start_node, start_node_with};
use serde_json::json;
use starnotary_app::{Config, ContractArtifact, Error, Session};
use starnotary_mock_node::MockNodeConfig;

#[tokio::test]
async fn test_connects_and_binds_first_account() -> anyhow::Result<()> {
    println!("\n=== Test: session binds the first provider account ===");

    let node = start_node().await?;
    let session = connect(&node).await?;

    assert_eq!(node.network_id(), "5777");
    assert_eq!(session.network_id, node.network_id());
    assert_eq!(session.provider.url(), node.url());
    assert_eq!(session.account, node.accounts()[0]);
    assert_eq!(session.contract.address(), node.contract_address());
    Ok(())
}

#[tokio::test]
async fn test_establish_loads_artifact_from_disk() -> anyhow::Result<()> {
    println!("\n=== Test: establish reads the artifact file named by the config ===");

    let node = start_node().await?;
    let config = Config { artifact_path: artifact_path(), ..node_config(&node) };
    let session = Session::establish(&config).await?;

    assert_eq!(session.contract.address(), node.contract_address());
    Ok(())
}

#[tokio::test]
async fn test_unsupported_network_fails() -> anyhow::Result<()> {
    println!("\n=== Test: a network with no deployment entry is rejected ===");

    let node = start_node_with(MockNodeConfig {
        network_id: "1337".into(),
        ..MockNodeConfig::default()
    })
    .await?;

    let result = Session::establish_with(&node_config(&node), load_artifact()?).await;
    match result {
        Err(Error::UnsupportedNetwork(id)) => assert_eq!(id, "1337"),
        other => panic!("expected UnsupportedNetwork, got {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[tokio::test]
async fn test_network_resolution_happens_before_account_access() -> anyhow::Result<()> {
    println!("\n=== Test: deployment lookup runs before the account query ===");

    // Accounts are denied AND the network is unknown; the network error
    // must win, proving the resolution order.
    let node = start_node_with(MockNodeConfig {
        network_id: "1337".into(),
        fail_accounts: true,
        ..MockNodeConfig::default()
    })
    .await?;

    let result = Session::establish_with(&node_config(&node), load_artifact()?).await;
    assert!(matches!(result, Err(Error::UnsupportedNetwork(_))));
    Ok(())
}

#[tokio::test]
async fn test_denied_account_access_fails() -> anyhow::Result<()> {
    println!("\n=== Test: a provider that denies account access fails bootstrap ===");

    let node = start_node_with(MockNodeConfig {
        fail_accounts: true,
        ..MockNodeConfig::default()
    })
    .await?;

    let result = Session::establish_with(&node_config(&node), load_artifact()?).await;
    match result {
        Err(e) => assert!(e.to_string().contains("account listing disabled")),
        Ok(_) => panic!("expected bootstrap to fail"),
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_account_list_fails() -> anyhow::Result<()> {
    println!("\n=== Test: an empty account list fails bootstrap ===");

    let node = start_node_with(MockNodeConfig {
        accounts: 0,
        ..MockNodeConfig::default()
    })
    .await?;

    let result = Session::establish_with(&node_config(&node), load_artifact()?).await;
    assert!(matches!(result, Err(Error::NoAccounts)));
    Ok(())
}

#[tokio::test]
async fn test_unreachable_endpoint_fails() -> anyhow::Result<()> {
    println!("\n=== Test: an unreachable endpoint surfaces as an rpc error ===");

    let config = Config {
        rpc_url: Some("http://127.0.0.1:1".into()),
        ..Config::default()
    };
    let result = Session::establish_with(&config, load_artifact()?).await;
    assert!(matches!(result, Err(Error::Rpc(_))));
    Ok(())
}

#[tokio::test]
async fn test_artifact_with_extra_networks_resolves_current_one() -> anyhow::Result<()> {
    println!("\n=== Test: resolution picks the entry matching the reported network ===");

    let node = start_node().await?;
    let artifact = ContractArtifact::from_value(json!({
        "contractName": "StarNotary",
        "abi": load_artifact_abi()?,
        "networks": {
            "1": {"address": "0x00000000000000000000000000000000000000aa"},
            "5777": {"address": "0x46bc9ac096c113b167c3f1bbcf66b8a61604ea4a"},
            "42": {"address": "0x00000000000000000000000000000000000000bb"}
        }
    }))?;

    let session = Session::establish_with(&node_config(&node), artifact).await?;
    assert_eq!(session.contract.address(), node.contract_address());
    Ok(())
}

fn load_artifact_abi() -> anyhow::Result<serde_json::Value> {
    let raw = std::fs::read_to_string(artifact_path())?;
    let full: serde_json::Value = serde_json::from_str(&raw)?;
    Ok(full["abi"].clone())
}
