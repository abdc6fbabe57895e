pub mod audit_log;
pub mod pg_user_store;
pub mod user_row;
pub mod user_store;
