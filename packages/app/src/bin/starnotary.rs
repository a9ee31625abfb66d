//! Star Notary terminal front end.

use starnotary_app::{actions, events, Config, ConsoleStatus, Session, StatusSink};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Star Notary");

    let config: Config = config::Config::builder()
        .add_source(config::File::with_name("starnotary").required(false))
        .add_source(config::Environment::with_prefix("STARNOTARY"))
        .build()?
        .try_deserialize()
        .unwrap_or_default();

    let session = match Session::establish(&config).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Could not connect to contract or chain.");
            std::process::exit(1);
        }
    };

    let status: Arc<dyn StatusSink> = Arc::new(ConsoleStatus);
    let subscription = events::watch_transfers(
        &session,
        Arc::clone(&status),
        Duration::from_millis(config.event_poll_ms),
    )
    .await?;

    info!(account = %session.account, "Ready");
    print_help();

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("create") => {
                let id = parts.next().and_then(|raw| raw.parse::<u128>().ok());
                let name = parts.collect::<Vec<_>>().join(" ");
                match id {
                    Some(id) if !name.is_empty() => {
                        actions::create_star(&session, status.as_ref(), &name, id).await;
                    }
                    _ => println!("usage: create <id> <name>"),
                }
            }
            Some("lookup") => match parts.next().and_then(|raw| raw.parse::<u128>().ok()) {
                Some(id) => actions::look_up(&session, status.as_ref(), id).await,
                None => println!("usage: lookup <id>"),
            },
            Some("help") => print_help(),
            Some("quit") | Some("exit") => break,
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }
    }

    subscription.stop().await;
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  create <id> <name>   claim a star with that token id");
    println!("  lookup <id>          look up a star by token id");
    println!("  quit                 exit");
}
