pub mod access;
pub mod auth;
pub mod empty_response;
pub mod error;
pub mod users;
