//! Star Notary mock node binary.

use starnotary_mock_node::{spawn, MockNodeConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Star Notary mock node");

    let config: MockNodeConfig = config::Config::builder()
        .add_source(config::File::with_name("starnotary-node").required(false))
        .add_source(config::Environment::with_prefix("STARNOTARY_NODE"))
        .build()?
        .try_deserialize()
        .unwrap_or_default();

    let node = spawn(config).await?;
    for (index, account) in node.accounts().iter().enumerate() {
        info!(index, account = %account, "Unlocked account");
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    node.shutdown();
    Ok(())
}
