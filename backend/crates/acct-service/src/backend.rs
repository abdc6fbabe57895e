use acct_cache::{RedisUserCache, UserCache};
use acct_db::{AuditLog, PgAuditLog, PgTx, PgTxManager, PgUserStore, TxManager, UserStore};

/// The set of collaborators a service runs against, tied to one transaction type.
pub trait Backend: Send + Sync + 'static {
    type Tx: Send + 'static;
    type Store: UserStore<Tx = Self::Tx>;
    type Audit: AuditLog<Tx = Self::Tx>;
    type TxManager: TxManager<Tx = Self::Tx>;
    type Cache: UserCache;
}

/// Postgres store of record with a Redis cache.
pub struct LiveBackend;

impl Backend for LiveBackend {
    type Tx = PgTx;
    type Store = PgUserStore;
    type Audit = PgAuditLog;
    type TxManager = PgTxManager;
    type Cache = RedisUserCache;
}
