use std::convert::Infallible;

use tracing::warn;

use crate::db::{ContactStore, StoreHandle};
use crate::types::contact::{DbState, HealthStatus};

/// Live store check for `/health`. The process is up if this runs at all, so
/// `ok` is always true; store trouble only shows in `db`.
pub async fn check(store: Option<&StoreHandle>) -> Result<HealthStatus, Infallible> {
    let db = match store {
        None => DbState::Disconnected,
        Some(store) => match store.probe().await {
            Ok(()) => DbState::Connected,
            Err(e) => {
                warn!(error = %e, "health probe failed");
                DbState::Error
            }
        },
    };
    Ok(HealthStatus { ok: true, db })
}
