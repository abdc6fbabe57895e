use crate::queries::{USER_COLUMNS, build_get_query, build_update_query, first_missing};
use crate::{Credential, DbError, PgTx, Result as DbErrorResult, UserRow, UserStore};

use acct_core::{NewUser, Role, USER_ENTITY, User, UserFilter, UserKey, UserPatch};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: UserRow,
    password: Option<String>,
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    type Tx = PgTx;

    async fn create(
        &self,
        tx: &mut PgTx,
        user: &NewUser,
        password_hash: Option<&str>,
    ) -> DbErrorResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut **tx)
        .await?;

        row.try_into()
    }

    async fn update(&self, tx: &mut PgTx, patch: &UserPatch) -> DbErrorResult<DateTime<Utc>> {
        let mut builder = build_update_query(patch, Utc::now());

        builder
            .build_query_scalar::<DateTime<Utc>>()
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| DbError::not_found(USER_ENTITY, UserKey::Id(patch.id)))
    }

    async fn delete(&self, tx: &mut PgTx, id: i64) -> DbErrorResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(USER_ENTITY, UserKey::Id(id)));
        }

        Ok(())
    }

    async fn get(&self, filter: &UserFilter) -> DbErrorResult<User> {
        let key = filter.key()?;
        let mut builder = build_get_query(key);

        builder
            .build_query_as::<UserRow>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found(USER_ENTITY, key))?
            .try_into()
    }

    async fn find_credential(&self, name: &str) -> DbErrorResult<Credential> {
        let row = sqlx::query_as::<_, CredentialRow>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found(USER_ENTITY, UserKey::Name(name)))?;

        Ok(Credential {
            user: row.user.try_into()?,
            password_hash: row.password,
        })
    }

    async fn list(&self, limit: i64, offset: i64) -> DbErrorResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn check_users_exist(&self, ids: &[i64]) -> DbErrorResult<()> {
        let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        match first_missing(ids, &found) {
            Some(missing) => Err(DbError::not_found(USER_ENTITY, UserKey::Id(missing))),
            None => Ok(()),
        }
    }

    async fn endpoint_roles(&self, endpoint: &str) -> DbErrorResult<Vec<Role>> {
        let roles: Vec<String> =
            sqlx::query_scalar("SELECT role FROM permissions WHERE endpoint = $1")
                .bind(endpoint)
                .fetch_all(&self.pool)
                .await?;

        roles
            .iter()
            .map(|role| Role::from_stored(Some(role)).map_err(DbError::from))
            .collect()
    }
}
