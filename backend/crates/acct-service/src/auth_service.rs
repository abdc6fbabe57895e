use crate::{Backend, Result as ServiceErrorResult, ServiceError, verify_credential};

use acct_auth::{TokenKind, TokenManager};
use acct_db::{DbError, UserStore};

use std::sync::Arc;

use log::info;

/// Login and token exchange.
pub struct AuthService<B: Backend> {
    store: Arc<B::Store>,
    tokens: Arc<TokenManager>,
}

impl<B: Backend> Clone for AuthService<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<B: Backend> AuthService<B> {
    pub fn new(store: Arc<B::Store>, tokens: Arc<TokenManager>) -> Self {
        Self { store, tokens }
    }

    /// Check the password and issue a refresh token. Unknown names and wrong
    /// passwords are indistinguishable to the caller.
    pub async fn login(&self, name: &str, password: &str) -> ServiceErrorResult<String> {
        let credential = match self.store.find_credential(name).await {
            Ok(credential) => credential,
            Err(DbError::NotFound { .. }) => return Err(ServiceError::invalid_credential()),
            Err(e) => return Err(e.into()),
        };

        let hash = credential
            .password_hash
            .as_deref()
            .ok_or_else(ServiceError::invalid_credential)?;
        verify_credential(password, hash).await?;

        info!("User {} logged in", credential.user.id);
        Ok(self
            .tokens
            .issue(&credential.user.name, credential.user.role, TokenKind::Refresh)?)
    }

    /// Exchange a valid refresh token for a fresh one.
    pub fn refresh_token(&self, refresh_token: &str) -> ServiceErrorResult<String> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        Ok(self.tokens.issue(&claims.sub, claims.role, TokenKind::Refresh)?)
    }

    /// Exchange a valid refresh token for a short-lived access token.
    pub fn access_token(&self, refresh_token: &str) -> ServiceErrorResult<String> {
        let claims = self.tokens.verify(refresh_token, TokenKind::Refresh)?;
        Ok(self.tokens.issue(&claims.sub, claims.role, TokenKind::Access)?)
    }
}
