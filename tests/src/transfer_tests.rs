// =============================================================================
// Transfer Tests
// =============================================================================
// Direct star transfers between accounts.

use crate::utils::{assert_reverted, connect, create_star, owner_of, start_node};
use starnotary_types::abi::Value;

#[tokio::test]
async fn test_owner_can_transfer_star() -> anyhow::Result<()> {
    println!("\n=== Test: the owner can transfer a star ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let from = node.accounts()[0];
    let to = node.accounts()[1];

    create_star(&session, from, "awesome star", 7).await?;
    session
        .contract
        .send(from, "transferStar", &[Value::Address(to), Value::Uint(7)], 0)
        .await?;

    assert_eq!(owner_of(&session, 7).await?, to);
    Ok(())
}

#[tokio::test]
async fn test_non_owner_cannot_transfer_star() -> anyhow::Result<()> {
    println!("\n=== Test: a non-owner cannot transfer someone else's star ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let owner = node.accounts()[0];
    let stranger = node.accounts()[1];

    create_star(&session, owner, "awesome star", 7).await?;
    let result = session
        .contract
        .send(
            stranger,
            "transferStar",
            &[Value::Address(node.accounts()[2]), Value::Uint(7)],
            0,
        )
        .await;
    assert_reverted(result, "UNAUTHORIZED");

    assert_eq!(owner_of(&session, 7).await?, owner);
    Ok(())
}

#[tokio::test]
async fn test_received_star_can_be_transferred_on() -> anyhow::Result<()> {
    println!("\n=== Test: the recipient becomes the owner with full transfer rights ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let first = node.accounts()[0];
    let second = node.accounts()[1];
    let third = node.accounts()[2];

    create_star(&session, first, "awesome star", 7).await?;
    session
        .contract
        .send(first, "transferStar", &[Value::Address(second), Value::Uint(7)], 0)
        .await?;

    // The original owner has lost transfer rights.
    let result = session
        .contract
        .send(first, "transferStar", &[Value::Address(third), Value::Uint(7)], 0)
        .await;
    assert_reverted(result, "UNAUTHORIZED");

    session
        .contract
        .send(second, "transferStar", &[Value::Address(third), Value::Uint(7)], 0)
        .await?;
    assert_eq!(owner_of(&session, 7).await?, third);
    Ok(())
}
