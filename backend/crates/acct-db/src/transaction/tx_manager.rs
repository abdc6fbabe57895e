use crate::Result as DbErrorResult;

use async_trait::async_trait;
use log::debug;
use sqlx::{PgPool, Postgres, Transaction};

pub type PgTx = Transaction<'static, Postgres>;

/// Runs a unit of work at read-committed isolation.
///
/// The work receives the transaction by value and hands it back with its
/// result; the manager commits only then. An error, or the future being
/// dropped mid-flight, drops the transaction and rolls it back.
#[async_trait]
pub trait TxManager: Send + Sync + 'static {
    type Tx: Send + 'static;

    async fn read_committed<T, F, Fut>(&self, work: F) -> DbErrorResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Self::Tx) -> Fut + Send + 'static,
        Fut: Future<Output = DbErrorResult<(T, Self::Tx)>> + Send + 'static;
}

pub struct PgTxManager {
    pool: PgPool,
}

impl PgTxManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TxManager for PgTxManager {
    type Tx = PgTx;

    async fn read_committed<T, F, Fut>(&self, work: F) -> DbErrorResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Self::Tx) -> Fut + Send + 'static,
        Fut: Future<Output = DbErrorResult<(T, Self::Tx)>> + Send + 'static,
    {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await?;

        let (value, tx) = work(tx).await?;
        tx.commit().await?;
        debug!("Transaction committed");

        Ok(value)
    }
}
