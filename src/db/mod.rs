//! Database module: connection resolution, the store seam and its MySQL backend.
//!
//! Layout:
//! - `resolver.rs`: pure precedence rules turning settings into a connection plan
//! - `mysql.rs`: sqlx pool-backed [`ContactStore`]
//! - `models.rs`: the validated [`Submission`]
//! - `schema.rs`: SQL text (DDL, insert, probe)

pub mod models;
pub mod mysql;
pub mod resolver;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::config::DatabaseSettings;
use crate::error::IntakeError;

pub use models::Submission;
pub use mysql::ContactStorage;
pub use resolver::{ConnectionPlan, ResolveError};

/// Everything the request layer needs from the relational store.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Trivial read used only to check connectivity.
    async fn probe(&self) -> Result<(), IntakeError>;

    /// Append one contact record.
    async fn insert(&self, submission: &Submission) -> Result<(), IntakeError>;

    async fn close(&self) {}
}

/// The process-wide store, created once at startup.
pub type StoreHandle = Arc<dyn ContactStore>;

/// Resolve settings, build the pool and probe it.
///
/// Never fails: incomplete configuration or a failed probe yield `None`, and
/// the service keeps running with writes disabled.
pub async fn connect(settings: &DatabaseSettings) -> Option<StoreHandle> {
    let plan = match resolver::resolve(settings) {
        Ok(plan) => plan,
        Err(ResolveError::Incomplete { missing }) => {
            warn!(
                missing = %missing.join(", "),
                "database not configured; contact submissions are disabled"
            );
            return None;
        }
        Err(e) => {
            error!(error = %e, "invalid database configuration; contact submissions are disabled");
            return None;
        }
    };

    let options = match plan.connect_options() {
        Ok(options) => options,
        Err(e) => {
            error!(error = %e, "invalid database configuration; contact submissions are disabled");
            return None;
        }
    };

    info!(
        target_db = %plan.describe(),
        ssl = plan.ssl,
        pool_size = settings.pool_size(),
        "connecting to MySQL"
    );

    let storage =
        ContactStorage::connect_lazy(options, settings.pool_size(), settings.probe_timeout());

    if let Err(e) = storage.probe().await {
        error!(error = %e, "MySQL probe failed; contact submissions are disabled");
        storage.close().await;
        return None;
    }
    info!("connected to MySQL");

    if settings.bootstrap_schema() {
        match storage.init_schema().await {
            Ok(()) => info!("table `contatos` ready"),
            Err(e) => warn!(error = %e, "schema bootstrap failed; keeping connection"),
        }
    }

    let handle: StoreHandle = Arc::new(storage);
    Some(handle)
}
