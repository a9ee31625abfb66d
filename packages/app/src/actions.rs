//! User actions: claiming a star and looking one up.

use crate::status::StatusSink;
use crate::Session;
use starnotary_types::abi::Value;
use tracing::{debug, warn};

/// Shown as soon as a claim is submitted, before the node answers.
pub const STATUS_CREATING: &str = "Creating star ... ";

/// Shown when a claim is rejected. Every rejection collapses to this one
/// message; a taken id is by far the most common cause.
pub const STATUS_CREATE_FAILED: &str =
    "An error occured while creating the star, make sure the star ID is not taken!";

/// Submit a new star claim.
///
/// The status updates optimistically before the transaction resolves; the
/// success message arrives later through the transfer subscription, once
/// the mint event lands.
pub async fn create_star(session: &Session, status: &dyn StatusSink, name: &str, id: u128) {
    status.set_status(STATUS_CREATING);
    let args = [Value::Str(name.to_string()), Value::Uint(id)];
    if let Err(e) = session.contract.send(session.account, "createStar", &args, 0).await {
        debug!(error = %e, id, "createStar rejected");
        status.set_status(STATUS_CREATE_FAILED);
    }
}

/// Look up a star's name by token id and report it on the status line.
pub async fn look_up(session: &Session, status: &dyn StatusSink, id: u128) {
    let args = [Value::Uint(id)];
    match session
        .contract
        .call(Some(session.account), "lookUptokenIdToStarInfo", &args)
        .await
    {
        Ok(values) => {
            let name = values.first().and_then(|v| v.as_str()).unwrap_or_default();
            // An unclaimed id and a star claimed with an empty name both
            // come back as "", so this renders a legitimately empty name
            // as not found. The contract offers no existence check that
            // would let us tell them apart.
            if name.is_empty() {
                status.set_status(&format!("Star with id: {id} Not found"));
            } else {
                status.set_status(&format!("Star with id: {id} has a name of: {name}"));
            }
        }
        Err(e) => {
            warn!(error = %e, id, "lookUptokenIdToStarInfo failed");
        }
    }
}
