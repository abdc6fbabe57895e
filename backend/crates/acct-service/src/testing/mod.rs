//! In-memory backend: staged transactional writes, an audit sink and a
//! field-map cache, each with failure injection.

mod faults;
mod memory_cache;
mod memory_db;
mod memory_store;

pub use faults::Faults;
pub use memory_cache::MemoryUserCache;
pub use memory_db::{AuditRecord, MemoryAuditLog, MemoryTx, MemoryTxManager};
pub use memory_store::MemoryUserStore;

use crate::{AccessService, AuthService, Backend, UserService};

use acct_auth::TokenManager;
use acct_core::{Role, User};

use std::sync::{Arc, Mutex, PoisonError};

use memory_db::MemoryDb;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-with-at-least-32-bytes!!";

pub struct MemoryBackend;

impl Backend for MemoryBackend {
    type Tx = MemoryTx;
    type Store = MemoryUserStore;
    type Audit = MemoryAuditLog;
    type TxManager = MemoryTxManager;
    type Cache = MemoryUserCache;
}

/// All in-memory collaborators wired to one shared state.
pub struct MemoryHarness {
    db: Arc<Mutex<MemoryDb>>,
    pub faults: Arc<Faults>,
    pub store: Arc<MemoryUserStore>,
    pub audit: Arc<MemoryAuditLog>,
    pub tx_manager: Arc<MemoryTxManager>,
    pub cache: Arc<MemoryUserCache>,
    pub tokens: Arc<TokenManager>,
}

impl MemoryHarness {
    pub fn new() -> Self {
        let db = Arc::new(Mutex::new(MemoryDb::default()));
        let faults = Arc::new(Faults::default());

        Self {
            store: Arc::new(MemoryUserStore::new(Arc::clone(&db), Arc::clone(&faults))),
            audit: Arc::new(MemoryAuditLog::new(Arc::clone(&faults))),
            tx_manager: Arc::new(MemoryTxManager::new(Arc::clone(&db), Arc::clone(&faults))),
            cache: Arc::new(MemoryUserCache::new(Arc::clone(&faults))),
            tokens: Arc::new(TokenManager::with_hs256(
                TEST_JWT_SECRET,
                chrono::Duration::minutes(5),
                chrono::Duration::minutes(60),
            )),
            db,
            faults,
        }
    }

    pub fn user_service(&self) -> UserService<MemoryBackend> {
        UserService::new(
            Arc::clone(&self.store),
            Arc::clone(&self.audit),
            Arc::clone(&self.tx_manager),
            Arc::clone(&self.cache),
        )
    }

    pub fn auth_service(&self) -> AuthService<MemoryBackend> {
        AuthService::new(Arc::clone(&self.store), Arc::clone(&self.tokens))
    }

    pub fn access_service(&self) -> AccessService<MemoryBackend> {
        AccessService::new(Arc::clone(&self.store), Arc::clone(&self.tokens))
    }

    fn with_db<T>(&self, f: impl FnOnce(&mut MemoryDb) -> T) -> T {
        let mut db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut db)
    }

    /// Committed audit records in append order.
    pub fn audit_records(&self) -> Vec<AuditRecord> {
        self.with_db(|db| db.audit.clone())
    }

    /// Committed store-of-record row, bypassing the cache.
    pub fn stored_user(&self, id: i64) -> Option<User> {
        self.with_db(|db| db.users.get(&id).map(|row| row.user.clone()))
    }

    pub fn grant(&self, endpoint: &str, role: Role) {
        self.with_db(|db| {
            db.permissions
                .entry(endpoint.to_string())
                .or_default()
                .push(role)
        });
    }
}

impl Default for MemoryHarness {
    fn default() -> Self {
        Self::new()
    }
}
