// =============================================================================
// Star Creation Tests
// =============================================================================
// Claiming stars through the user action layer and reading them back,
// including the exact status lines the action layer renders.

use crate::utils::{connect, create_star, owner_of, start_node};
use starnotary_app::{actions, MemoryStatus};
use starnotary_types::abi::Value;

#[tokio::test]
async fn test_create_star_and_look_up() -> anyhow::Result<()> {
    println!("\n=== Test: a created star can be looked up by id ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let status = MemoryStatus::new();

    actions::create_star(&session, &status, "Awesome Star", 1).await;
    // Success leaves only the optimistic message; the follow-up arrives
    // through the event subscription, not here.
    assert_eq!(status.messages(), vec![actions::STATUS_CREATING.to_string()]);

    actions::look_up(&session, &status, 1).await;
    assert_eq!(
        status.last().as_deref(),
        Some("Star with id: 1 has a name of: Awesome Star")
    );

    assert_eq!(owner_of(&session, 1).await?, session.account);
    Ok(())
}

#[tokio::test]
async fn test_create_with_taken_id_reports_error() -> anyhow::Result<()> {
    println!("\n=== Test: claiming a taken id shows the fixed error line ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    create_star(&session, session.account, "First star", 5).await?;

    let status = MemoryStatus::new();
    actions::create_star(&session, &status, "Second star", 5).await;
    assert_eq!(
        status.messages(),
        vec![
            actions::STATUS_CREATING.to_string(),
            actions::STATUS_CREATE_FAILED.to_string(),
        ]
    );

    // The original claim is untouched.
    actions::look_up(&session, &status, 5).await;
    assert_eq!(
        status.last().as_deref(),
        Some("Star with id: 5 has a name of: First star")
    );
    Ok(())
}

#[tokio::test]
async fn test_look_up_missing_star_reports_not_found() -> anyhow::Result<()> {
    println!("\n=== Test: looking up an unclaimed id shows not found ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    let status = MemoryStatus::new();

    actions::look_up(&session, &status, 999).await;
    assert_eq!(status.last().as_deref(), Some("Star with id: 999 Not found"));
    Ok(())
}

#[tokio::test]
async fn test_star_claimed_with_empty_name_reads_as_not_found() -> anyhow::Result<()> {
    println!("\n=== Test: an empty stored name is indistinguishable from absence ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    create_star(&session, session.account, "", 7).await?;

    let status = MemoryStatus::new();
    actions::look_up(&session, &status, 7).await;
    assert_eq!(status.last().as_deref(), Some("Star with id: 7 Not found"));
    Ok(())
}

#[tokio::test]
async fn test_direct_call_returns_stored_name() -> anyhow::Result<()> {
    println!("\n=== Test: the raw contract call returns the stored name ===");

    let node = start_node().await?;
    let session = connect(&node).await?;
    create_star(&session, session.account, "First star", 999).await?;

    let values = session
        .contract
        .call(Some(session.account), "lookUptokenIdToStarInfo", &[Value::Uint(999)])
        .await?;
    assert_eq!(values[0].as_str(), Some("First star"));
    Ok(())
}

#[tokio::test]
async fn test_argument_shape_is_checked_before_the_wire() -> anyhow::Result<()> {
    println!("\n=== Test: wrong argument types fail locally as codec errors ===");

    let node = start_node().await?;
    let session = connect(&node).await?;

    let result = session
        .contract
        .send(session.account, "createStar", &[Value::Uint(1), Value::Uint(1)], 0)
        .await;
    match result {
        Err(e) => {
            let message = e.to_string();
            assert!(message.contains("codec error"), "unexpected error: {message}");
            assert!(message.contains("argument 0 expects string"), "unexpected error: {message}");
        }
        Ok(hash) => panic!("expected codec error, got tx {hash}"),
    }
    Ok(())
}
