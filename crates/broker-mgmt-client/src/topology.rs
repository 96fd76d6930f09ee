//! The throwaway exchange/queue pair a test run publishes into

use crate::{
    Error,
    ManagementClient,
    Result,
    types::{
        AckMode,
        BindingDeclaration,
        ExchangeDeclaration,
        ExchangeType,
        GetMessagesRequest,
        Message,
        QueueDeclaration,
        QueueInfo,
    },
};
use reqwest::Method;
use tracing::{
    debug,
    info,
};

pub const DEFAULT_EXCHANGE: &str = "pg_amqp_verify_exchange";
pub const DEFAULT_QUEUE: &str = "pg_amqp_verify_queue";

/// Names of the fanout exchange and the queue bound to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    pub exchange: String,
    pub queue: String,
}

impl Default for Topology {
    fn default() -> Self {
        Self {
            exchange: DEFAULT_EXCHANGE.to_string(),
            queue: DEFAULT_QUEUE.to_string(),
        }
    }
}

impl Topology {
    pub fn new(exchange: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            queue: queue.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.exchange.is_empty() {
            return Err(Error::ConfigError("Exchange name cannot be empty".to_string()));
        }
        if self.queue.is_empty() {
            return Err(Error::ConfigError("Queue name cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// A management client bound to one test topology
///
/// Every resource is non-durable and never auto-deleted: it lives exactly
/// from `declare_*` until the matching `delete_*`.
#[derive(Debug, Clone)]
pub struct Broker {
    client: ManagementClient,
    topology: Topology,
}

impl Broker {
    pub fn new(client: ManagementClient, topology: Topology) -> Result<Self> {
        topology.validate()?;
        Ok(Self { client, topology })
    }

    pub fn client(&self) -> &ManagementClient {
        &self.client
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    fn vhost(&self) -> &str {
        &self.client.config().vhost
    }

    /// `PUT /api/exchanges/{vhost}/{exchange}` as a transient fanout exchange
    pub async fn declare_exchange(&self) -> Result<()> {
        let body = ExchangeDeclaration {
            kind: ExchangeType::Fanout,
            durable: false,
            auto_delete: false,
        };
        self.client
            .send_json(
                Method::PUT,
                &["exchanges", self.vhost(), self.topology.exchange.as_str()],
                &body,
            )
            .await?;
        info!(exchange = %self.topology.exchange, vhost = %self.vhost(), "Declared exchange");
        Ok(())
    }

    /// `PUT /api/queues/{vhost}/{queue}` as a transient queue
    pub async fn declare_queue(&self) -> Result<()> {
        let body = QueueDeclaration {
            durable: false,
            auto_delete: false,
        };
        self.client
            .send_json(
                Method::PUT,
                &["queues", self.vhost(), self.topology.queue.as_str()],
                &body,
            )
            .await?;
        info!(queue = %self.topology.queue, vhost = %self.vhost(), "Declared queue");
        Ok(())
    }

    /// Bind the queue to the exchange with an empty routing key
    ///
    /// Both ends must already exist.
    pub async fn bind(&self) -> Result<()> {
        let body = BindingDeclaration {
            routing_key: String::new(),
        };
        self.client
            .send_json(
                Method::POST,
                &[
                    "bindings",
                    self.vhost(),
                    "e",
                    self.topology.exchange.as_str(),
                    "q",
                    self.topology.queue.as_str(),
                ],
                &body,
            )
            .await?;
        info!(
            exchange = %self.topology.exchange,
            queue = %self.topology.queue,
            "Bound queue to exchange"
        );
        Ok(())
    }

    /// Delete the queue. Returns `false` if it did not exist.
    pub async fn delete_queue(&self) -> Result<bool> {
        let reply = self
            .client
            .send(
                Method::DELETE,
                &["queues", self.vhost(), self.topology.queue.as_str()],
            )
            .await?;
        let existed = !reply.is_not_found();
        debug!(queue = %self.topology.queue, existed, "Deleted queue");
        Ok(existed)
    }

    /// Delete the exchange. Returns `false` if it did not exist.
    pub async fn delete_exchange(&self) -> Result<bool> {
        let reply = self
            .client
            .send(
                Method::DELETE,
                &["exchanges", self.vhost(), self.topology.exchange.as_str()],
            )
            .await?;
        let existed = !reply.is_not_found();
        debug!(exchange = %self.topology.exchange, existed, "Deleted exchange");
        Ok(existed)
    }

    /// Drop every message in the queue, keeping the queue and its binding
    pub async fn purge(&self) -> Result<()> {
        self.client
            .send(
                Method::DELETE,
                &["queues", self.vhost(), self.topology.queue.as_str(), "contents"],
            )
            .await?;
        info!(queue = %self.topology.queue, "Purged queue");
        Ok(())
    }

    /// `GET /api/queues/{vhost}/{queue}`, `None` if the queue does not exist
    pub async fn queue_info(&self) -> Result<Option<QueueInfo>> {
        self.client
            .request(Method::GET, &["queues", self.vhost(), self.topology.queue.as_str()])
            .await
    }

    /// Number of messages in the queue, `None` if the queue does not exist
    pub async fn queue_depth(&self) -> Result<Option<u64>> {
        Ok(self.queue_info().await?.map(|info| info.messages))
    }

    /// Fetch up to `count` messages in delivery order
    ///
    /// With `AckMode::AckRequeueTrue` the messages are put back and the call
    /// is a peek; with `AckMode::AckRequeueFalse` they are consumed. A missing
    /// or empty queue yields an empty list.
    pub async fn get_messages(&self, count: u32, ackmode: AckMode) -> Result<Vec<Message>> {
        let body = GetMessagesRequest::new(count, ackmode);
        let messages: Option<Vec<Message>> = self
            .client
            .request_json(
                Method::POST,
                &["queues", self.vhost(), self.topology.queue.as_str(), "get"],
                &body,
            )
            .await?;
        let messages = messages.unwrap_or_default();
        debug!(
            queue = %self.topology.queue,
            ?ackmode,
            fetched = messages.len(),
            "Fetched messages"
        );
        Ok(messages)
    }
}
