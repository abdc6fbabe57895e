use crate::{Role, UserPatch};

use googletest::assert_that;
use googletest::prelude::{eq, len};

#[test]
fn given_email_only_patch_when_changed_fields_then_only_email() {
    // Given
    let patch = UserPatch::new(3).email("a@x.com");

    // When
    let fields = patch.changed_fields();

    // Then
    assert_that!(fields, eq(&vec!["email"]));
}

#[test]
fn given_full_patch_when_changed_fields_then_column_order() {
    let patch = UserPatch::new(3).role(Role::Admin).name("n").email("e@x.io");

    assert_that!(patch.changed_fields(), eq(&vec!["name", "email", "role"]));
}

#[test]
fn given_empty_patch_when_changed_fields_then_none() {
    assert_that!(UserPatch::new(1).changed_fields(), len(eq(0)));
}

#[test]
fn given_empty_strings_when_building_patch_then_fields_left_out() {
    // Given
    let patch = UserPatch::new(4).name("").email("").role(Role::User);

    // When
    let fields = patch.changed_fields();

    // Then
    assert_that!(fields, eq(&vec!["role"]));
    assert!(patch.name.is_none());
    assert!(patch.email.is_none());
}
