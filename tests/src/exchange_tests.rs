// =============================================================================
// Exchange Tests
// =============================================================================
// Two-sided star exchanges: approvals, the guarding revert reasons, and
// the offer/deal events the contract emits along the way.

use crate::utils::{assert_reverted, connect, create_star, owner_of, start_node};
use starnotary_app::provider::FilterOptions;
use starnotary_types::abi::{self, Value};

#[tokio::test]
async fn test_two_users_can_exchange_stars() -> anyhow::Result<()> {
    println!("\n=== Test: mutually approved stars swap owners ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let alice = node.accounts()[0];
    let bob = node.accounts()[1];

    create_star(&session, alice, "alice star", 1).await?;
    create_star(&session, bob, "bob star", 2).await?;

    session
        .contract
        .send(alice, "approveForExchange", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;
    session
        .contract
        .send(bob, "approveForExchange", &[Value::Uint(2), Value::Uint(1)], 0)
        .await?;
    session
        .contract
        .send(bob, "exchangeStars", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;

    assert_eq!(owner_of(&session, 1).await?, bob);
    assert_eq!(owner_of(&session, 2).await?, alice);
    Ok(())
}

#[tokio::test]
async fn test_exchange_without_mutual_approval_reverts() -> anyhow::Result<()> {
    println!("\n=== Test: a one-sided approval is not enough to exchange ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let alice = node.accounts()[0];
    let bob = node.accounts()[1];

    create_star(&session, alice, "alice star", 1).await?;
    create_star(&session, bob, "bob star", 2).await?;
    session
        .contract
        .send(alice, "approveForExchange", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;

    let result = session
        .contract
        .send(alice, "exchangeStars", &[Value::Uint(1), Value::Uint(2)], 0)
        .await;
    assert_reverted(result, "Exchange not approved by both token owners");

    assert_eq!(owner_of(&session, 1).await?, alice);
    assert_eq!(owner_of(&session, 2).await?, bob);
    Ok(())
}

#[tokio::test]
async fn test_approving_for_a_missing_desired_token_reverts() -> anyhow::Result<()> {
    println!("\n=== Test: approving against an unclaimed desired token reverts ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    create_star(&session, node.accounts()[0], "alice star", 1).await?;

    let result = session
        .contract
        .send(node.accounts()[0], "approveForExchange", &[Value::Uint(1), Value::Uint(404)], 0)
        .await;
    assert_reverted(result, "Desired token not found");
    Ok(())
}

#[tokio::test]
async fn test_approving_someone_elses_token_reverts() -> anyhow::Result<()> {
    println!("\n=== Test: only the owner can offer a token for exchange ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    create_star(&session, node.accounts()[0], "alice star", 1).await?;
    create_star(&session, node.accounts()[1], "bob star", 2).await?;

    let result = session
        .contract
        .send(node.accounts()[2], "approveForExchange", &[Value::Uint(1), Value::Uint(2)], 0)
        .await;
    assert_reverted(result, "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn test_approvals_are_consumed_by_the_exchange() -> anyhow::Result<()> {
    println!("\n=== Test: a completed exchange clears both approvals ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let alice = node.accounts()[0];
    let bob = node.accounts()[1];

    create_star(&session, alice, "alice star", 1).await?;
    create_star(&session, bob, "bob star", 2).await?;
    session
        .contract
        .send(alice, "approveForExchange", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;
    session
        .contract
        .send(bob, "approveForExchange", &[Value::Uint(2), Value::Uint(1)], 0)
        .await?;
    session
        .contract
        .send(alice, "exchangeStars", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;

    let result = session
        .contract
        .send(alice, "exchangeStars", &[Value::Uint(1), Value::Uint(2)], 0)
        .await;
    assert_reverted(result, "Exchange not approved by both token owners");
    Ok(())
}

#[tokio::test]
async fn test_offer_event_carries_both_token_ids() -> anyhow::Result<()> {
    println!("\n=== Test: the exchange offer event carries owned and desired ids ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let alice = node.accounts()[0];
    let bob = node.accounts()[1];

    create_star(&session, alice, "alice star", 1).await?;
    create_star(&session, bob, "bob star", 2).await?;

    // Watch every offer event the contract emits from this point on.
    let offer_topic = session.contract.event_topic("starExchangeOffer")?;
    let filter_id = session
        .provider
        .new_filter(&FilterOptions {
            address: session.contract.address(),
            topics: vec![Some(format!("0x{}", hex::encode(offer_topic)))],
            from_block: "latest".to_string(),
        })
        .await?;

    session
        .contract
        .send(alice, "approveForExchange", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;

    let logs = session.provider.filter_changes(&filter_id).await?;
    assert_eq!(logs.len(), 1);
    let payload = abi::decode(
        &session.contract.event_data_types("starExchangeOffer")?,
        &logs[0].data_bytes(),
    )?;
    assert_eq!(payload[0].as_uint(), Some(1));
    assert_eq!(payload[1].as_uint(), Some(2));

    session.provider.uninstall_filter(&filter_id).await?;
    Ok(())
}

#[tokio::test]
async fn test_deal_event_carries_both_token_ids() -> anyhow::Result<()> {
    println!("\n=== Test: a completed exchange emits the deal event with both ids ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let alice = node.accounts()[0];
    let bob = node.accounts()[1];

    create_star(&session, alice, "alice star", 1).await?;
    create_star(&session, bob, "bob star", 2).await?;
    session
        .contract
        .send(alice, "approveForExchange", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;
    session
        .contract
        .send(bob, "approveForExchange", &[Value::Uint(2), Value::Uint(1)], 0)
        .await?;

    // The deal topic skips the offer and Transfer logs the flow also emits.
    let deal_topic = session.contract.event_topic("starExchangeDeal")?;
    let filter_id = session
        .provider
        .new_filter(&FilterOptions {
            address: session.contract.address(),
            topics: vec![Some(format!("0x{}", hex::encode(deal_topic)))],
            from_block: "latest".to_string(),
        })
        .await?;

    session
        .contract
        .send(bob, "exchangeStars", &[Value::Uint(1), Value::Uint(2)], 0)
        .await?;

    let logs = session.provider.filter_changes(&filter_id).await?;
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].topic(0), Some(deal_topic));
    let payload = abi::decode(
        &session.contract.event_data_types("starExchangeDeal")?,
        &logs[0].data_bytes(),
    )?;
    assert_eq!(payload[0].as_uint(), Some(1));
    assert_eq!(payload[1].as_uint(), Some(2));

    session.provider.uninstall_filter(&filter_id).await?;
    Ok(())
}
