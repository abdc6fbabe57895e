pub mod new_user;
pub mod password;
pub mod role;
pub mod user;
pub mod user_filter;
pub mod user_patch;
