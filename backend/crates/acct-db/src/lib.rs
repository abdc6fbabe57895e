pub mod connection;
pub mod error;
pub mod queries;
pub mod repositories;
pub mod transaction;

pub use connection::{connect, run_migrations};
pub use error::{DbError, Result};
pub use repositories::audit_log::{AuditLog, PgAuditLog};
pub use repositories::pg_user_store::PgUserStore;
pub use repositories::user_row::UserRow;
pub use repositories::user_store::{Credential, UserStore};
pub use transaction::tx_manager::{PgTx, PgTxManager, TxManager};

#[cfg(test)]
mod tests;
