use crate::{
    EventError, MessageHandler, MessageSource, Result as EventErrorResult, SourceConnector,
};

use acct_config::KafkaConfig;
use acct_service::{Metrics, RetryPolicy, ShutdownGuard, with_retry};

use std::time::Duration;

use log::{debug, info, warn};

/// Consumer-group loop: join, poll, handle, ack, commit.
///
/// A handler failure commits what was handled so far, leaves the group and
/// rejoins after `redelivery_backoff`, so the failed message is delivered
/// again from the committed offset.
pub struct EventConsumer<C: SourceConnector, H: MessageHandler> {
    connector: C,
    handler: H,
    redelivery_backoff: Duration,
    join_retry: RetryPolicy,
    metrics: Metrics,
}

impl<C: SourceConnector, H: MessageHandler> EventConsumer<C, H> {
    pub fn new(connector: C, handler: H, redelivery_backoff: Duration) -> Self {
        Self {
            connector,
            handler,
            redelivery_backoff,
            join_retry: RetryPolicy::default(),
            metrics: Metrics::new(),
        }
    }

    pub fn from_config(connector: C, handler: H, config: &KafkaConfig) -> Self {
        Self::new(
            connector,
            handler,
            Duration::from_millis(config.redelivery_backoff_ms),
        )
    }

    pub fn with_join_retry(mut self, policy: RetryPolicy) -> Self {
        self.join_retry = policy;
        self
    }

    /// Runs until `shutdown` fires (returning `EventError::Cancelled`) or the
    /// group cannot be joined.
    pub async fn run(self, mut shutdown: ShutdownGuard) -> EventErrorResult<()> {
        loop {
            let join = with_retry(&self.join_retry, "Consumer group join", || {
                self.connector.join()
            });
            let mut session = tokio::select! {
                biased;
                _ = shutdown.wait() => return Err(EventError::cancelled()),
                joined = join => joined?,
            };

            match self.run_session(&mut session, &mut shutdown).await {
                Err(e) if e.is_cancelled() => {
                    info!("Event consumer stopped");
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        "Consumer session ended: {e}. Rejoining in {:?}",
                        self.redelivery_backoff
                    );
                    drop(session);
                    tokio::select! {
                        biased;
                        _ = shutdown.wait() => return Err(EventError::cancelled()),
                        _ = tokio::time::sleep(self.redelivery_backoff) => {}
                    }
                }
                Ok(()) => debug!("Consumer session closed, rejoining"),
            }
        }
    }

    async fn run_session(
        &self,
        session: &mut C::Source,
        shutdown: &mut ShutdownGuard,
    ) -> EventErrorResult<()> {
        loop {
            let deliveries = tokio::select! {
                biased;
                _ = shutdown.wait() => return Err(EventError::cancelled()),
                polled = session.poll() => polled?,
            };

            for delivery in &deliveries {
                debug!(
                    "Message claimed: topic = {}, partition = {}, offset = {}",
                    delivery.topic, delivery.partition, delivery.offset
                );

                match self.handler.handle(&delivery.value).await {
                    Ok(disposition) => {
                        self.metrics.event_consumed(disposition.as_str());
                        session.ack(delivery).await?;
                    }
                    Err(e) => {
                        self.metrics.event_consumed("failed");
                        session.commit().await?;
                        return Err(e);
                    }
                }
            }

            if !deliveries.is_empty() {
                session.commit().await?;
            }
        }
    }
}
