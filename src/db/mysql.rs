use std::time::Duration;

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};

use crate::db::ContactStore;
use crate::db::models::Submission;
use crate::db::schema::{INSERT_CONTACT, MYSQL_INIT, PROBE};
use crate::error::IntakeError;

pub type MySqlPool = Pool<MySql>;

/// Acquire waits this long before giving up, which in practice means callers
/// queue for a free slot rather than being rejected.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct ContactStorage {
    pool: MySqlPool,
    probe_timeout: Duration,
}

impl ContactStorage {
    pub fn new(pool: MySqlPool, probe_timeout: Duration) -> Self {
        Self {
            pool,
            probe_timeout,
        }
    }

    /// Builds a lazily-connecting pool; nothing touches the network until the
    /// first query.
    pub fn connect_lazy(
        options: MySqlConnectOptions,
        pool_size: u32,
        probe_timeout: Duration,
    ) -> Self {
        let pool = MySqlPoolOptions::new()
            .max_connections(pool_size)
            .min_connections(0)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_lazy_with(options);
        Self::new(pool, probe_timeout)
    }

    /// Create the contact table if it does not exist yet.
    pub async fn init_schema(&self) -> Result<(), IntakeError> {
        sqlx::query(MYSQL_INIT).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ContactStore for ContactStorage {
    async fn probe(&self) -> Result<(), IntakeError> {
        let query = sqlx::query(PROBE).execute(&self.pool);
        match tokio::time::timeout(self.probe_timeout, query).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(IntakeError::Probe(e.to_string())),
            Err(_) => Err(IntakeError::Probe(format!(
                "no response within {}s",
                self.probe_timeout.as_secs()
            ))),
        }
    }

    async fn insert(&self, submission: &Submission) -> Result<(), IntakeError> {
        sqlx::query(INSERT_CONTACT)
            .bind(&submission.nome)
            .bind(&submission.email)
            .bind(&submission.mensagem)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
