use serde_json::Value;
use tracing::{error, info, warn};

use crate::db::{ContactStore, StoreHandle, Submission};
use crate::error::IntakeError;

/// Validate one payload and persist it.
///
/// Order matters: presence is checked before the store is consulted, so a bad
/// payload is rejected even while the database is down.
pub async fn submit(store: Option<&StoreHandle>, payload: &Value) -> Result<(), IntakeError> {
    let submission = Submission::from_payload(payload).inspect_err(|_| {
        info!("rejected contact submission with missing fields");
    })?;

    let Some(store) = store else {
        warn!("contact submission received but no database handle is available");
        return Err(IntakeError::StoreUnavailable);
    };

    store.insert(&submission).await.inspect_err(|e| {
        error!(error = %e, "failed to insert contact");
    })?;

    info!("contact stored");
    Ok(())
}
