use crate::{EventError, Result as EventErrorResult, UserCreatedEvent};

use acct_service::{Backend, ServiceError, UserService};

use async_trait::async_trait;
use log::{error, info, warn};

/// What happened to a message the handler accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// New account written to store and cache.
    Applied,
    /// The account already exists; a redelivery of an applied event.
    Replayed,
    /// Unusable payload, dropped.
    Poison,
    /// Committed, but the cache could not be updated.
    Desynced,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Replayed => "replayed",
            Self::Poison => "poison",
            Self::Desynced => "desync",
        }
    }
}

/// Processes one message payload. An `Err` leaves the message unacknowledged.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, payload: &[u8]) -> EventErrorResult<Disposition>;
}

/// Replays user-created events through the same create pipeline as the RPC path.
pub struct UserSaveHandler<B: Backend> {
    users: UserService<B>,
}

impl<B: Backend> UserSaveHandler<B> {
    pub fn new(users: UserService<B>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<B: Backend> MessageHandler for UserSaveHandler<B> {
    async fn handle(&self, payload: &[u8]) -> EventErrorResult<Disposition> {
        let user = match UserCreatedEvent::decode(payload).and_then(UserCreatedEvent::into_new_user)
        {
            Ok(user) => user,
            Err(e) => {
                warn!("Dropping unusable user event: {e}");
                return Ok(Disposition::Poison);
            }
        };
        let name = user.name.clone();

        match self.users.create(user).await {
            Ok(outcome) => match outcome.desync {
                None => {
                    info!("User with ID {} created from event", outcome.value);
                    Ok(Disposition::Applied)
                }
                Some(desync) => {
                    error!("User {} created from event: {desync}", outcome.value);
                    Ok(Disposition::Desynced)
                }
            },
            Err(ServiceError::AlreadyExists { field, .. }) => {
                info!("User '{name}' already exists ({field}), treating event as applied");
                Ok(Disposition::Replayed)
            }
            Err(e @ ServiceError::InvalidInput { .. }) => {
                warn!("Dropping user event for '{name}': {e}");
                Ok(Disposition::Poison)
            }
            Err(e) => Err(EventError::from(e)),
        }
    }
}
