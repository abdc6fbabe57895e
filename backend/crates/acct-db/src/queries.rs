//! Statement builders and result helpers shared by the Postgres repositories.

use acct_core::{UserKey, UserPatch};

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

pub const USER_COLUMNS: &str = "id, name, email, role, created_at, updated_at";

/// `SELECT` for a single user by one unique key.
pub fn build_get_query(key: UserKey<'_>) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE "));
    match key {
        UserKey::Id(id) => {
            builder.push("id = ").push_bind(id);
        }
        UserKey::Name(name) => {
            builder.push("name = ").push_bind(name);
        }
    }
    builder
}

/// Partial `UPDATE` touching only the fields present in `patch`.
///
/// `updated_at` is always written and never moves backwards: it becomes the
/// later of `now` and one microsecond past its stored value.
pub fn build_update_query(patch: &UserPatch, now: DateTime<Utc>) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::new("UPDATE users SET updated_at = GREATEST(");
    builder
        .push_bind(now)
        .push(", updated_at + INTERVAL '1 microsecond')");

    if let Some(name) = patch.name.as_deref() {
        builder.push(", name = ").push_bind(name);
    }
    if let Some(email) = patch.email.as_deref() {
        builder.push(", email = ").push_bind(email);
    }
    if let Some(role) = patch.role {
        builder.push(", role = ").push_bind(role.as_str());
    }

    builder
        .push(" WHERE id = ")
        .push_bind(patch.id)
        .push(" RETURNING updated_at");
    builder
}

/// First requested ID (in request order) that is not in `found`.
pub fn first_missing(requested: &[i64], found: &[i64]) -> Option<i64> {
    let found: HashSet<i64> = found.iter().copied().collect();
    requested.iter().copied().find(|id| !found.contains(id))
}
