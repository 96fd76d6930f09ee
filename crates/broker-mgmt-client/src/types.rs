//! Request and response bodies of the management API
//!
//! Only the fields this crate reads are modelled; unknown fields in responses
//! are ignored.

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

/// How `POST /api/queues/{vhost}/{queue}/get` treats the fetched messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AckMode {
    /// Acknowledge and drop: the messages are consumed
    AckRequeueFalse,
    /// Put the messages back: a non-destructive peek
    AckRequeueTrue,
}

impl AckMode {
    pub fn consume(consume: bool) -> Self {
        if consume {
            AckMode::AckRequeueFalse
        } else {
            AckMode::AckRequeueTrue
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeType {
    Direct,
    Fanout,
    Topic,
    Headers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeDeclaration {
    #[serde(rename = "type")]
    pub kind: ExchangeType,
    pub durable: bool,
    pub auto_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueDeclaration {
    pub durable: bool,
    pub auto_delete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingDeclaration {
    pub routing_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GetMessagesRequest {
    pub count: u32,
    pub ackmode: AckMode,
    /// `auto` returns UTF-8 payloads as strings and everything else base64
    pub encoding: &'static str,
}

impl GetMessagesRequest {
    pub fn new(count: u32, ackmode: AckMode) -> Self {
        Self {
            count,
            ackmode,
            encoding: "auto",
        }
    }
}

/// Subset of `GET /api/overview`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub rabbitmq_version: Option<String>,
    #[serde(default)]
    pub management_version: Option<String>,
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Every other top-level field, unparsed
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl Overview {
    /// True when the broker answered with an empty object
    pub fn is_empty(&self) -> bool {
        self.rabbitmq_version.is_none()
            && self.management_version.is_none()
            && self.cluster_name.is_none()
            && self.other.is_empty()
    }
}

/// Subset of `GET /api/queues/{vhost}/{queue}`
///
/// Counters are absent until the broker has emitted the first stats event
/// for a fresh queue, so they default to zero.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct QueueInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub vhost: String,
    #[serde(default)]
    pub durable: bool,
    #[serde(default)]
    pub auto_delete: bool,
    #[serde(default)]
    pub messages: u64,
    #[serde(default)]
    pub messages_ready: u64,
    #[serde(default)]
    pub messages_unacknowledged: u64,
}

/// A message as returned by the queue `get` endpoint
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub payload_bytes: u64,
    #[serde(default)]
    pub payload_encoding: String,
    #[serde(default)]
    pub routing_key: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub redelivered: bool,
    /// Messages left in the queue after this one was fetched
    #[serde(default)]
    pub message_count: u64,
    #[serde(default, deserialize_with = "properties_or_empty_list")]
    pub properties: MessageProperties,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MessageProperties {
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub delivery_mode: Option<u8>,
    #[serde(default)]
    pub headers: Option<serde_json::Map<String, serde_json::Value>>,
}

// The broker serializes an empty property table as `[]` rather than `{}`.
fn properties_or_empty_list<'de, D>(deserializer: D) -> Result<MessageProperties, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<serde_json::Value>),
        Table(MessageProperties),
    }

    match Raw::deserialize(deserializer)? {
        Raw::List(_) => Ok(MessageProperties::default()),
        Raw::Table(properties) => Ok(properties),
    }
}
