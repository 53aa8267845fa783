use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::util::Timeout;
use std::time::Duration;
use tracing::{error, info};

use railrover_core::messaging::{MessagePublisher, PublishError};

#[derive(Clone)]
pub struct EventProducer {
    producer: FutureProducer,
}

impl EventProducer {
    pub fn new(brokers: &str) -> Result<Self, rdkafka::error::KafkaError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "5000")
            .create()?;

        Ok(Self { producer })
    }

    pub async fn send(&self, topic: &str, payload: &str) -> Result<(), rdkafka::error::KafkaError> {
        let record = FutureRecord::<(), _>::to(topic).payload(payload);

        match self.producer.send(record, Timeout::After(Duration::from_secs(0))).await {
            Ok(delivery) => {
                let partition = delivery.partition;
                let offset = delivery.offset;
                info!("Sent message to {}: partition {} offset {}", topic, partition, offset);
                Ok(())
            }
            Err((e, _msg)) => {
                error!("Failed to send message to {}: {}", topic, e);
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MessagePublisher for EventProducer {
    async fn publish(&self, channel: &str, payload: &str) -> Result<(), PublishError> {
        self.send(channel, payload)
            .await
            .map_err(|e| PublishError(e.to_string()))
    }
}
