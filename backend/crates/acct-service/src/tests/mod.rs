mod auth_service;
mod retry;

use acct_core::{NewUser, Role};

pub(crate) fn new_user(name: &str) -> NewUser {
    NewUser::new(name, format!("{name}@example.com"), Role::User)
}
