// =============================================================================
// Token Metadata Tests
// =============================================================================
// The token's name and symbol, and the dev-chain account funding the
// other suites rely on.

use crate::utils::{connect, start_node, start_node_with, ONE_ETH};
use starnotary_mock_node::MockNodeConfig;

#[tokio::test]
async fn test_token_name_and_symbol() -> anyhow::Result<()> {
    println!("\n=== Test: the token reports its name and symbol ===");

    let node = start_node().await?;
    let session = connect(&node).await?;

    let name = session.contract.call(None, "name", &[]).await?;
    assert_eq!(name[0].as_str(), Some("Star Notary"));

    let symbol = session.contract.call(None, "symbol", &[]).await?;
    assert_eq!(symbol[0].as_str(), Some("STAR"));
    Ok(())
}

#[tokio::test]
async fn test_configured_token_metadata_is_served() -> anyhow::Result<()> {
    println!("\n=== Test: node configuration controls the token metadata ===");

    let node = start_node_with(MockNodeConfig {
        token_name: "Night Sky Registry".into(),
        token_symbol: "NSR".into(),
        ..MockNodeConfig::default()
    })
    .await?;
    let session = connect(&node).await?;

    let name = session.contract.call(None, "name", &[]).await?;
    assert_eq!(name[0].as_str(), Some("Night Sky Registry"));

    let symbol = session.contract.call(None, "symbol", &[]).await?;
    assert_eq!(symbol[0].as_str(), Some("NSR"));
    Ok(())
}

#[tokio::test]
async fn test_dev_accounts_are_funded() -> anyhow::Result<()> {
    println!("\n=== Test: every dev account starts with the fixed funding ===");

    let node = start_node().await?;
    let session = connect(&node).await?;

    for account in node.accounts() {
        assert_eq!(session.provider.balance(account).await?, 100 * ONE_ETH);
    }
    Ok(())
}
