//! Live transfer-event subscription.
//!
//! Installs a node-side log filter for `Transfer` events whose recipient
//! is the active account, starting at the latest block, then polls it on
//! an interval. Each matching log pushes the success message to the
//! status sink. Poll failures are logged and the loop keeps going; a
//! transient node hiccup should not kill the subscription.

use crate::provider::{FilterOptions, Provider};
use crate::status::StatusSink;
use crate::{Error, Session};
use starnotary_types::abi;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Pushed once per observed incoming transfer.
pub const STATUS_STAR_CREATED: &str = "Star created successfully!";

/// A running transfer subscription.
///
/// `stop` tears the subscription down cleanly, uninstalling the
/// node-side filter. Dropping the handle merely aborts the poll task and
/// leaves the filter to the node's own expiry.
pub struct TransferSubscription {
    provider: Arc<Provider>,
    filter_id: String,
    task: JoinHandle<()>,
}

impl TransferSubscription {
    pub fn filter_id(&self) -> &str {
        &self.filter_id
    }

    /// End the poll loop and remove the filter from the node.
    pub async fn stop(&self) {
        self.task.abort();
        if let Err(e) = self.provider.uninstall_filter(&self.filter_id).await {
            debug!(error = %e, filter = %self.filter_id, "uninstalling transfer filter failed");
        }
    }
}

impl Drop for TransferSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start watching for stars transferred to the session account.
///
/// Only events from this point forward are reported; history is not
/// replayed. The recipient topic is position 2 of the `Transfer`
/// signature, position 1 (the sender) stays a wildcard.
pub async fn watch_transfers(
    session: &Session,
    status: Arc<dyn StatusSink>,
    poll_interval: Duration,
) -> Result<TransferSubscription, Error> {
    let topic0 = session.contract.event_topic("Transfer")?;
    let recipient = abi::encode_topic_address(&session.account);
    let filter = FilterOptions {
        address: session.contract.address(),
        topics: vec![Some(topic_hex(&topic0)), None, Some(topic_hex(&recipient))],
        from_block: "latest".to_string(),
    };
    let filter_id = session.provider.new_filter(&filter).await?;
    debug!(filter = %filter_id, account = %session.account, "transfer filter installed");

    let provider = Arc::clone(&session.provider);
    let poll_id = filter_id.clone();
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match provider.filter_changes(&poll_id).await {
                Ok(logs) => {
                    for log in logs {
                        debug!(tx = %log.transaction_hash, "incoming transfer observed");
                        status.set_status(STATUS_STAR_CREATED);
                    }
                }
                Err(e) => warn!(error = %e, filter = %poll_id, "transfer filter poll failed"),
            }
        }
    });

    Ok(TransferSubscription {
        provider: Arc::clone(&session.provider),
        filter_id,
        task,
    })
}

fn topic_hex(topic: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(topic))
}
