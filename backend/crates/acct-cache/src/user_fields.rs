//! Conversions between [`User`] and its cache field-map.
//!
//! Timestamps are stored as integer nanoseconds since the Unix epoch.

use crate::{CacheError, Result as CacheErrorResult};

use acct_core::{Role, User, UserPatch};

use std::collections::HashMap;
use std::panic::Location;

use acct_core::ErrorLocation;
use chrono::{DateTime, Utc};

pub const FIELD_ID: &str = "id";
pub const FIELD_NAME: &str = "name";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_ROLE: &str = "role";
pub const FIELD_CREATED_AT: &str = "created_at";
pub const FIELD_UPDATED_AT: &str = "updated_at";

pub type FieldMap = Vec<(&'static str, String)>;

pub fn cache_key(id: i64) -> String {
    id.to_string()
}

#[track_caller]
pub fn to_nanos(field: &'static str, at: DateTime<Utc>) -> CacheErrorResult<String> {
    at.timestamp_nanos_opt()
        .map(|nanos| nanos.to_string())
        .ok_or_else(|| CacheError::Encode {
            field,
            message: format!("{at} is outside the nanosecond range"),
            location: ErrorLocation::from(Location::caller()),
        })
}

fn from_nanos(field: &'static str, raw: &str) -> CacheErrorResult<DateTime<Utc>> {
    raw.parse::<i64>()
        .map(DateTime::from_timestamp_nanos)
        .map_err(|e| CacheError::decode(field, e.to_string()))
}

pub fn to_fields(user: &User) -> CacheErrorResult<FieldMap> {
    Ok(vec![
        (FIELD_ID, user.id.to_string()),
        (FIELD_NAME, user.name.clone()),
        (FIELD_EMAIL, user.email.clone()),
        (FIELD_ROLE, user.role.as_str().to_string()),
        (FIELD_CREATED_AT, to_nanos(FIELD_CREATED_AT, user.created_at)?),
        (FIELD_UPDATED_AT, to_nanos(FIELD_UPDATED_AT, user.updated_at)?),
    ])
}

/// Fields to overwrite for a partial update; always includes `updated_at`.
pub fn patch_fields(patch: &UserPatch, updated_at: DateTime<Utc>) -> CacheErrorResult<FieldMap> {
    let mut fields = Vec::with_capacity(4);
    if let Some(name) = &patch.name {
        fields.push((FIELD_NAME, name.clone()));
    }
    if let Some(email) = &patch.email {
        fields.push((FIELD_EMAIL, email.clone()));
    }
    if let Some(role) = patch.role {
        fields.push((FIELD_ROLE, role.as_str().to_string()));
    }
    fields.push((FIELD_UPDATED_AT, to_nanos(FIELD_UPDATED_AT, updated_at)?));
    Ok(fields)
}

/// Rebuild a user from an `HGETALL` result. The key is authoritative for the ID.
pub fn from_fields(id: i64, fields: &HashMap<String, String>) -> CacheErrorResult<User> {
    let required = |field: &'static str| {
        fields
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| CacheError::decode(field, "missing"))
    };

    let role = Role::from_stored(fields.get(FIELD_ROLE).map(String::as_str))
        .map_err(|e| CacheError::decode(FIELD_ROLE, e.to_string()))?;

    Ok(User {
        id,
        name: required(FIELD_NAME)?.to_string(),
        email: required(FIELD_EMAIL)?.to_string(),
        role,
        created_at: from_nanos(FIELD_CREATED_AT, required(FIELD_CREATED_AT)?)?,
        updated_at: from_nanos(FIELD_UPDATED_AT, required(FIELD_UPDATED_AT)?)?,
    })
}
