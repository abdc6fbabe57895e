use crate::{PgTx, Result as DbErrorResult};

use async_trait::async_trait;

/// Append-only audit sink written inside the caller's transaction.
#[async_trait]
pub trait AuditLog: Send + Sync + 'static {
    type Tx: Send + 'static;

    /// `user_id` is `None` when the record is not tied to a live row.
    async fn append(
        &self,
        tx: &mut Self::Tx,
        user_id: Option<i64>,
        details: &str,
    ) -> DbErrorResult<()>;
}

pub struct PgAuditLog;

#[async_trait]
impl AuditLog for PgAuditLog {
    type Tx = PgTx;

    async fn append(
        &self,
        tx: &mut PgTx,
        user_id: Option<i64>,
        details: &str,
    ) -> DbErrorResult<()> {
        sqlx::query("INSERT INTO users_logs (user_id, details) VALUES ($1, $2)")
            .bind(user_id)
            .bind(details)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
