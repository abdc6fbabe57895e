//! Asynchronous ingestion of user-created events from a consumer group.

pub mod consumer;
pub mod error;
pub mod handler;
pub mod kafka_source;
pub mod source;
pub mod user_created_event;

pub use consumer::EventConsumer;
pub use error::{EventError, Result};
pub use handler::{Disposition, MessageHandler, UserSaveHandler};
pub use kafka_source::{KafkaConnector, KafkaSource};
pub use source::{Delivery, MessageSource, SourceConnector};
pub use user_created_event::UserCreatedEvent;

#[cfg(test)]
mod tests;
