use crate::Result as EventErrorResult;

use async_trait::async_trait;

/// One message handed out by a consumer session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    pub value: Vec<u8>,
}

/// A joined consumer-group session.
///
/// Offsets marked with `ack` survive only once `commit` returns. Dropping a
/// session leaves the group; the next session resumes at the last commit.
#[async_trait]
pub trait MessageSource: Send {
    /// Next batch; empty when nothing arrived within the fetch window.
    async fn poll(&mut self) -> EventErrorResult<Vec<Delivery>>;

    async fn ack(&mut self, delivery: &Delivery) -> EventErrorResult<()>;

    async fn commit(&mut self) -> EventErrorResult<()>;
}

/// Joins the consumer group, producing a fresh session each time.
#[async_trait]
pub trait SourceConnector: Send + Sync + 'static {
    type Source: MessageSource;

    async fn join(&self) -> EventErrorResult<Self::Source>;
}
