pub mod error;
pub mod models;
pub mod validation;

pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use models::new_user::NewUser;
pub use models::password::Password;
pub use models::role::Role;
pub use models::user::User;
pub use models::user_filter::{UserFilter, UserKey};
pub use models::user_patch::UserPatch;
pub use validation::{validate_email, validate_password};

/// Entity name used in not-found messages.
pub const USER_ENTITY: &str = "user";

#[cfg(test)]
mod tests;
