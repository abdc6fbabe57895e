use crate::{Delivery, EventError, MessageSource, Result as EventErrorResult, SourceConnector};

use acct_config::KafkaConfig;

use async_trait::async_trait;
use kafka::consumer::{Consumer, FetchOffset, GroupOffsetStorage};
use log::{debug, info};

/// Connects to the brokers listed in `[kafka]`.
#[derive(Debug, Clone)]
pub struct KafkaConnector {
    brokers: Vec<String>,
    group_id: String,
    topics: Vec<String>,
}

impl KafkaConnector {
    pub fn new(config: &KafkaConfig) -> Self {
        Self {
            brokers: config
                .brokers
                .iter()
                .map(|b| b.trim().to_string())
                .filter(|b| !b.is_empty())
                .collect(),
            group_id: config.group_id.clone(),
            topics: config.topics(),
        }
    }
}

#[async_trait]
impl SourceConnector for KafkaConnector {
    type Source = KafkaSource;

    async fn join(&self) -> EventErrorResult<KafkaSource> {
        let brokers = self.brokers.clone();
        let group_id = self.group_id.clone();
        let topics = self.topics.clone();

        let consumer = tokio::task::spawn_blocking(move || {
            let mut builder = Consumer::from_hosts(brokers)
                .with_group(group_id)
                .with_fallback_offset(FetchOffset::Earliest)
                .with_offset_storage(Some(GroupOffsetStorage::Kafka));
            for topic in topics {
                builder = builder.with_topic(topic);
            }
            builder.create()
        })
        .await??;

        info!(
            "Joined consumer group '{}' on {:?}",
            self.group_id, self.topics
        );
        Ok(KafkaSource {
            consumer: Some(consumer),
        })
    }
}

/// A `kafka` consumer driven from the blocking pool.
///
/// The consumer moves into each blocking call and back out; if a call is
/// abandoned mid-flight the session is unusable and reports `Disconnected`.
pub struct KafkaSource {
    consumer: Option<Consumer>,
}

impl KafkaSource {
    async fn blocking<T, F>(&mut self, work: F) -> EventErrorResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Consumer) -> Result<T, kafka::Error> + Send + 'static,
    {
        let mut consumer = self.consumer.take().ok_or_else(EventError::disconnected)?;
        let (consumer, result) = tokio::task::spawn_blocking(move || {
            let result = work(&mut consumer);
            (consumer, result)
        })
        .await?;
        self.consumer = Some(consumer);
        Ok(result?)
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn poll(&mut self) -> EventErrorResult<Vec<Delivery>> {
        let deliveries = self
            .blocking(|consumer| {
                let sets = consumer.poll()?;
                let mut deliveries = Vec::new();
                for set in sets.iter() {
                    for message in set.messages() {
                        deliveries.push(Delivery {
                            topic: set.topic().to_string(),
                            partition: set.partition(),
                            offset: message.offset,
                            value: message.value.to_vec(),
                        });
                    }
                }
                Ok(deliveries)
            })
            .await?;

        if !deliveries.is_empty() {
            debug!("Polled {} messages", deliveries.len());
        }
        Ok(deliveries)
    }

    async fn ack(&mut self, delivery: &Delivery) -> EventErrorResult<()> {
        let consumer = self.consumer.as_mut().ok_or_else(EventError::disconnected)?;
        consumer.consume_message(&delivery.topic, delivery.partition, delivery.offset)?;
        Ok(())
    }

    async fn commit(&mut self) -> EventErrorResult<()> {
        self.blocking(|consumer| consumer.commit_consumed()).await
    }
}
