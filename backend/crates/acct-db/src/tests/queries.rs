use crate::queries::{build_get_query, build_update_query, first_missing};

use acct_core::{Role, UserKey, UserPatch};

use chrono::Utc;
use googletest::assert_that;
use googletest::prelude::{eq, none, some};

#[test]
fn given_email_only_patch_when_building_update_then_only_email_and_timestamp_set() {
    // Given
    let patch = UserPatch::new(7).email("a@x.com");

    // When
    let builder = build_update_query(&patch, Utc::now());
    let sql = builder.sql();

    // Then
    assert!(sql.starts_with("UPDATE users SET updated_at = GREATEST($1"));
    assert!(sql.contains("email = $2"));
    assert!(!sql.contains("name ="));
    assert!(!sql.contains("role ="));
    assert!(sql.ends_with("WHERE id = $3 RETURNING updated_at"));
}

#[test]
fn given_full_patch_when_building_update_then_all_columns_in_order() {
    // Given
    let patch = UserPatch::new(1).name("bob").email("b@x.com").role(Role::Admin);

    // When
    let builder = build_update_query(&patch, Utc::now());

    // Then
    assert_that!(
        builder.sql(),
        eq("UPDATE users SET updated_at = GREATEST($1, updated_at + INTERVAL '1 microsecond'), \
            name = $2, email = $3, role = $4 WHERE id = $5 RETURNING updated_at")
    );
}

#[test]
fn given_empty_patch_when_building_update_then_timestamp_still_refreshed() {
    let patch = UserPatch::new(1);

    let builder = build_update_query(&patch, Utc::now());

    assert!(builder.sql().contains("updated_at = GREATEST($1"));
    assert!(builder.sql().contains("WHERE id = $2"));
}

#[test]
fn given_id_key_when_building_get_then_filters_by_id() {
    let builder = build_get_query(UserKey::Id(3));

    assert!(builder.sql().ends_with("FROM users WHERE id = $1"));
}

#[test]
fn given_name_key_when_building_get_then_filters_by_name() {
    let builder = build_get_query(UserKey::Name("bob"));

    assert!(builder.sql().ends_with("FROM users WHERE name = $1"));
}

#[test]
fn given_missing_ids_when_first_missing_then_first_in_request_order() {
    // Given
    let requested = [4, 9, 2, 7];
    let found = [4, 7];

    // Then
    assert_that!(first_missing(&requested, &found), some(eq(9)));
}

#[test]
fn given_all_present_when_first_missing_then_none() {
    assert_that!(first_missing(&[1, 2, 3], &[3, 2, 1]), none());
}

#[test]
fn given_duplicate_request_ids_when_first_missing_then_reports_once() {
    assert_that!(first_missing(&[5, 5, 6], &[6]), some(eq(5)));
}
