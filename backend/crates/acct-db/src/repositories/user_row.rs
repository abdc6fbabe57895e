use crate::{DbError, Result as DbErrorResult};

use acct_core::{Role, User};

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row shape of the `users` table minus the credential column.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DbError;

    fn try_from(row: UserRow) -> DbErrorResult<Self> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            role: Role::from_stored(row.role.as_deref())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
