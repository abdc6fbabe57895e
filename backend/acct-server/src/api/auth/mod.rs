pub mod auth;
pub mod login_request;
pub mod token_request;
pub mod token_responses;
