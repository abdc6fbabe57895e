use crate::testing::Faults;
use crate::testing::memory_db::{
    MemoryDb, MemoryTx, Staged, StoredUser, lock, next_updated_at, not_found,
};

use acct_core::{NewUser, Role, USER_ENTITY, User, UserFilter, UserKey, UserPatch};
use acct_db::{Credential, DbError, Result as DbErrorResult, UserStore};

use std::collections::BTreeMap;
use std::panic::Location;
use std::sync::{Arc, Mutex};

use acct_core::ErrorLocation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub struct MemoryUserStore {
    db: Arc<Mutex<MemoryDb>>,
    faults: Arc<Faults>,
}

impl MemoryUserStore {
    pub(crate) fn new(db: Arc<Mutex<MemoryDb>>, faults: Arc<Faults>) -> Self {
        Self { db, faults }
    }
}

#[track_caller]
fn already_exists(field: &'static str) -> DbError {
    DbError::AlreadyExists {
        field,
        location: ErrorLocation::from(Location::caller()),
    }
}

fn check_unique(
    users: &BTreeMap<i64, User>,
    skip_id: Option<i64>,
    name: Option<&str>,
    email: Option<&str>,
) -> DbErrorResult<()> {
    for user in users.values().filter(|u| Some(u.id) != skip_id) {
        if name == Some(user.name.as_str()) {
            return Err(already_exists("name"));
        }
        if email == Some(user.email.as_str()) {
            return Err(already_exists("email"));
        }
    }
    Ok(())
}

#[async_trait]
impl UserStore for MemoryUserStore {
    type Tx = MemoryTx;

    async fn create(
        &self,
        tx: &mut MemoryTx,
        user: &NewUser,
        password_hash: Option<&str>,
    ) -> DbErrorResult<User> {
        Faults::check_db(&self.faults.store_writes)?;

        let mut db = lock(&self.db);
        check_unique(
            &db.view(tx),
            None,
            Some(user.name.as_str()),
            Some(user.email.as_str()),
        )?;

        let now = Utc::now();
        let created = User {
            id: db.allocate_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tx.staged.push(Staged::Insert(StoredUser {
            user: created.clone(),
            password_hash: password_hash.map(str::to_owned),
        }));

        Ok(created)
    }

    async fn update(&self, tx: &mut MemoryTx, patch: &UserPatch) -> DbErrorResult<DateTime<Utc>> {
        Faults::check_db(&self.faults.store_writes)?;
        let db = lock(&self.db);
        let view = db.view(tx);

        let current = view.get(&patch.id).ok_or_else(|| not_found(patch.id))?;
        check_unique(
            &view,
            Some(patch.id),
            patch.name.as_deref(),
            patch.email.as_deref(),
        )?;

        let updated_at = next_updated_at(current.updated_at);
        tx.staged.push(Staged::Update {
            patch: patch.clone(),
            updated_at,
        });

        Ok(updated_at)
    }

    async fn delete(&self, tx: &mut MemoryTx, id: i64) -> DbErrorResult<()> {
        Faults::check_db(&self.faults.store_writes)?;
        let db = lock(&self.db);
        if !db.view(tx).contains_key(&id) {
            return Err(not_found(id));
        }
        tx.staged.push(Staged::Delete(id));
        Ok(())
    }

    async fn get(&self, filter: &UserFilter) -> DbErrorResult<User> {
        let key = filter.key()?;
        Faults::check_db(&self.faults.store_reads)?;
        let db = lock(&self.db);

        let found = match key {
            UserKey::Id(id) => db.users.get(&id).map(|row| row.user.clone()),
            UserKey::Name(name) => db
                .users
                .values()
                .find(|row| row.user.name == name)
                .map(|row| row.user.clone()),
        };

        found.ok_or_else(|| DbError::not_found(USER_ENTITY, key))
    }

    async fn find_credential(&self, name: &str) -> DbErrorResult<Credential> {
        Faults::check_db(&self.faults.store_reads)?;
        let db = lock(&self.db);

        db.users
            .values()
            .find(|row| row.user.name == name)
            .map(|row| Credential {
                user: row.user.clone(),
                password_hash: row.password_hash.clone(),
            })
            .ok_or_else(|| DbError::not_found(USER_ENTITY, UserKey::Name(name)))
    }

    async fn list(&self, limit: i64, offset: i64) -> DbErrorResult<Vec<User>> {
        Faults::check_db(&self.faults.store_reads)?;
        let db = lock(&self.db);

        Ok(db
            .users
            .values()
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|row| row.user.clone())
            .collect())
    }

    async fn check_users_exist(&self, ids: &[i64]) -> DbErrorResult<()> {
        Faults::check_db(&self.faults.store_reads)?;
        let db = lock(&self.db);

        match ids.iter().find(|id| !db.users.contains_key(id)) {
            Some(missing) => Err(not_found(*missing)),
            None => Ok(()),
        }
    }

    async fn endpoint_roles(&self, endpoint: &str) -> DbErrorResult<Vec<Role>> {
        Faults::check_db(&self.faults.store_reads)?;
        let db = lock(&self.db);
        Ok(db.permissions.get(endpoint).cloned().unwrap_or_default())
    }
}
