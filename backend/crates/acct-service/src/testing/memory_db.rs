use crate::testing::Faults;

use acct_core::{Role, USER_ENTITY, User, UserKey, UserPatch};
use acct_db::{AuditLog, DbError, Result as DbErrorResult, TxManager};

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
    pub user: User,
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    pub user_id: Option<i64>,
    pub details: String,
}

#[derive(Debug, Default)]
pub(crate) struct MemoryDb {
    pub users: BTreeMap<i64, StoredUser>,
    pub next_id: i64,
    pub audit: Vec<AuditRecord>,
    pub permissions: HashMap<String, Vec<Role>>,
}

#[derive(Debug, Clone)]
pub(crate) enum Staged {
    Insert(StoredUser),
    Update {
        patch: UserPatch,
        updated_at: DateTime<Utc>,
    },
    Delete(i64),
    Audit(AuditRecord),
}

/// Writes staged by one unit of work; applied only on commit.
#[derive(Debug, Default)]
pub struct MemoryTx {
    pub(crate) staged: Vec<Staged>,
}

impl MemoryDb {
    pub(crate) fn allocate_id(&mut self) -> i64 {
        // Like a sequence, IDs are consumed even if the transaction rolls back.
        self.next_id += 1;
        self.next_id
    }

    /// Committed rows with `tx`'s pending writes layered on top.
    pub(crate) fn view(&self, tx: &MemoryTx) -> BTreeMap<i64, User> {
        let mut users: BTreeMap<i64, User> = self
            .users
            .iter()
            .map(|(id, row)| (*id, row.user.clone()))
            .collect();
        for op in &tx.staged {
            match op {
                Staged::Insert(row) => {
                    users.insert(row.user.id, row.user.clone());
                }
                Staged::Update { patch, updated_at } => {
                    if let Some(user) = users.get_mut(&patch.id) {
                        apply_patch(user, patch, *updated_at);
                    }
                }
                Staged::Delete(id) => {
                    users.remove(id);
                }
                Staged::Audit(_) => {}
            }
        }
        users
    }

    fn apply(&mut self, staged: Vec<Staged>) {
        for op in staged {
            match op {
                Staged::Insert(row) => {
                    self.users.insert(row.user.id, row);
                }
                Staged::Update { patch, updated_at } => {
                    if let Some(row) = self.users.get_mut(&patch.id) {
                        apply_patch(&mut row.user, &patch, updated_at);
                    }
                }
                Staged::Delete(id) => {
                    self.users.remove(&id);
                }
                Staged::Audit(record) => self.audit.push(record),
            }
        }
    }
}

fn apply_patch(user: &mut User, patch: &UserPatch, updated_at: DateTime<Utc>) {
    if let Some(name) = &patch.name {
        user.name = name.clone();
    }
    if let Some(email) = &patch.email {
        user.email = email.clone();
    }
    if let Some(role) = patch.role {
        user.role = role;
    }
    user.updated_at = updated_at;
}

/// Strictly after `previous`, even if the clock has not moved.
pub(crate) fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + TimeDelta::microseconds(1))
}

pub(crate) fn not_found(id: i64) -> DbError {
    DbError::not_found(USER_ENTITY, UserKey::Id(id))
}

pub(crate) fn lock(db: &Mutex<MemoryDb>) -> std::sync::MutexGuard<'_, MemoryDb> {
    db.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct MemoryTxManager {
    db: Arc<Mutex<MemoryDb>>,
    faults: Arc<Faults>,
}

impl MemoryTxManager {
    pub(crate) fn new(db: Arc<Mutex<MemoryDb>>, faults: Arc<Faults>) -> Self {
        Self { db, faults }
    }
}

#[async_trait]
impl TxManager for MemoryTxManager {
    type Tx = MemoryTx;

    async fn read_committed<T, F, Fut>(&self, work: F) -> DbErrorResult<T>
    where
        T: Send + 'static,
        F: FnOnce(Self::Tx) -> Fut + Send + 'static,
        Fut: Future<Output = DbErrorResult<(T, Self::Tx)>> + Send + 'static,
    {
        let (value, tx) = work(MemoryTx::default()).await?;
        Faults::check_db(&self.faults.commit)?;
        lock(&self.db).apply(tx.staged);
        Ok(value)
    }
}

pub struct MemoryAuditLog {
    faults: Arc<Faults>,
}

impl MemoryAuditLog {
    pub(crate) fn new(faults: Arc<Faults>) -> Self {
        Self { faults }
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    type Tx = MemoryTx;

    async fn append(
        &self,
        tx: &mut MemoryTx,
        user_id: Option<i64>,
        details: &str,
    ) -> DbErrorResult<()> {
        Faults::check_db(&self.faults.audit)?;
        tx.staged.push(Staged::Audit(AuditRecord {
            user_id,
            details: details.to_string(),
        }));
        Ok(())
    }
}
