#![allow(dead_code)]

//! Shared setup for the Postgres repository tests.
//!
//! Each test gets a fresh database from `#[sqlx::test]` with the crate's
//! migrations applied. They need a reachable server in `DATABASE_URL` and are
//! ignored by default: run with `cargo test -p acct-db -- --ignored`.

use acct_core::{NewUser, Role, User};
use acct_db::{AuditLog, PgAuditLog, PgTxManager, PgUserStore, TxManager, UserStore};

use std::sync::Arc;

use sqlx::PgPool;

pub fn new_user(name: &str) -> NewUser {
    NewUser::new(name, format!("{name}@example.com"), Role::User)
}

/// Insert and audit through the transaction manager, as the service does.
pub async fn insert_user(pool: &PgPool, user: NewUser) -> User {
    let store = Arc::new(PgUserStore::new(pool.clone()));
    PgTxManager::new(pool.clone())
        .read_committed(move |mut tx| async move {
            let created = store.create(&mut tx, &user, Some("$argon2id$stub")).await?;
            let details = format!("user created with ID {}", created.id);
            PgAuditLog.append(&mut tx, Some(created.id), &details).await?;
            Ok((created, tx))
        })
        .await
        .expect("Failed to insert test user")
}

pub async fn count_users(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .expect("Failed to count users")
}

pub async fn audit_rows(pool: &PgPool) -> Vec<(Option<i64>, String)> {
    sqlx::query_as("SELECT user_id, details FROM users_logs ORDER BY id")
        .fetch_all(pool)
        .await
        .expect("Failed to read audit log")
}
