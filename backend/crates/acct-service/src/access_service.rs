use crate::{Backend, Result as ServiceErrorResult, ServiceError};

use acct_auth::{Claims, TokenKind, TokenManager, extract_bearer};
use acct_core::ErrorLocation;
use acct_db::UserStore;

use std::panic::Location;
use std::sync::Arc;

use log::debug;

/// Per-endpoint role check for bearer access tokens.
pub struct AccessService<B: Backend> {
    store: Arc<B::Store>,
    tokens: Arc<TokenManager>,
}

impl<B: Backend> Clone for AccessService<B> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            tokens: Arc::clone(&self.tokens),
        }
    }
}

impl<B: Backend> AccessService<B> {
    pub fn new(store: Arc<B::Store>, tokens: Arc<TokenManager>) -> Self {
        Self { store, tokens }
    }

    /// `authorization` is the raw header value. Returns the caller's claims
    /// when their role is granted `endpoint`.
    pub async fn check(
        &self,
        authorization: Option<&str>,
        endpoint: &str,
    ) -> ServiceErrorResult<Claims> {
        let token = extract_bearer(authorization)?;
        let claims = self.tokens.verify(token, TokenKind::Access)?;

        let roles = self.store.endpoint_roles(endpoint).await?;
        if roles.contains(&claims.role) {
            debug!("{} ({}) granted {}", claims.sub, claims.role, endpoint);
            return Ok(claims);
        }

        Err(ServiceError::Forbidden {
            endpoint: endpoint.to_string(),
            role: claims.role,
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
