pub mod bearer;
pub mod claims;
pub mod error;
pub mod password_hasher;
pub mod token_manager;

pub use bearer::extract_bearer;
pub use claims::{Claims, TokenKind};
pub use error::{AuthError, Result};
pub use password_hasher::{hash_password, verify_password};
pub use token_manager::TokenManager;

#[cfg(test)]
mod tests;
