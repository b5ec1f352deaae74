//! Fan-out of domain events to NATS.

use tracing::{info, warn};

use crate::domain::events::DomainEvent;

#[derive(Clone, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self { Self { nats } }

    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else { return Self::default() };
        match async_nats::connect(url).await {
            Ok(client) => {
                info!(%url, "connected to NATS");
                Self::new(Some(client))
            }
            Err(e) => {
                warn!(%url, error = %e, "NATS unavailable, events will only be logged");
                Self::default()
            }
        }
    }

    /// Publishing is best effort: failures are logged, never surfaced to the caller.
    pub async fn publish(&self, events: Vec<DomainEvent>) {
        for event in events {
            info!(subject = event.subject(), ?event, "domain event");
            let Some(client) = &self.nats else { continue };
            let payload = match serde_json::to_vec(&event) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!(error = %e, "failed to encode domain event");
                    continue;
                }
            };
            if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
                warn!(subject = event.subject(), error = %e, "failed to publish domain event");
            }
        }
    }
}
