//! The three delivery checks: message count, message content, empty queue

use crate::poll::{
    PollPolicy,
    StallDetector,
};
use async_trait::async_trait;
use broker_mgmt_client::{
    AckMode,
    Broker,
    Message,
    Result,
};
use tracing::{
    debug,
    warn,
};

/// Messages inspected per peek
pub const FETCH_LIMIT: u32 = 100;

/// Read access to the queue under test
#[async_trait]
pub trait QueueSource: Send + Sync {
    /// Current message count, `None` if the queue does not exist
    async fn depth(&self) -> Result<Option<u64>>;

    /// Fetch up to `count` messages in delivery order
    async fn fetch(&self, count: u32, ackmode: AckMode) -> Result<Vec<Message>>;
}

#[async_trait]
impl QueueSource for Broker {
    async fn depth(&self) -> Result<Option<u64>> {
        self.queue_depth().await
    }

    async fn fetch(&self, count: u32, ackmode: AckMode) -> Result<Vec<Message>> {
        self.get_messages(count, ackmode).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountVerdict {
    /// At least `expected` messages were seen
    Reached { count: u64, expected: i64 },
    QueueMissing,
    /// Gave up with `count` messages: either the budget ran out or the count
    /// stalled short of the target
    Short {
        count: u64,
        expected: i64,
        attempts: u32,
        stalled: bool,
    },
}

impl CountVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, CountVerdict::Reached { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageVerdict {
    Found,
    /// Payloads seen on the final peek
    Missing { observed: Vec<String> },
}

impl MessageVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, MessageVerdict::Found)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyVerdict {
    Empty,
    QueueMissing,
    NotEmpty { count: u64 },
}

impl EmptyVerdict {
    pub fn passed(&self) -> bool {
        matches!(self, EmptyVerdict::Empty)
    }
}

/// Wait for the queue to hold at least `expected` messages
///
/// A missing queue ends the wait at once. A nonzero count that stops moving
/// for `stall_threshold` repeats ends it early; a count stuck at zero uses
/// the whole budget.
pub async fn verify_count<S>(
    source: &S,
    expected: i64,
    policy: &PollPolicy,
) -> Result<CountVerdict>
where
    S: QueueSource + ?Sized,
{
    let mut detector = StallDetector::new(policy.stall_threshold);
    let mut count = 0;
    let mut stalled = false;
    let mut attempts = 0;

    for attempt in 1..=policy.max_attempts {
        attempts = attempt;
        count = match source.depth().await? {
            Some(count) => count,
            None => return Ok(CountVerdict::QueueMissing),
        };
        debug!(attempt, count, expected, "Polled queue depth");

        if i128::from(count) >= i128::from(expected) {
            return Ok(CountVerdict::Reached { count, expected });
        }

        if detector.observe(count) {
            warn!(
                count,
                expected,
                repeats = detector.repeats(),
                "Queue depth stopped changing short of the target"
            );
            stalled = true;
            break;
        }

        policy.pause_after(attempt).await;
    }

    Ok(CountVerdict::Short {
        count,
        expected,
        attempts,
        stalled,
    })
}

/// Wait for a message whose payload equals `content`
///
/// Messages are peeked, never consumed, while searching. Once the payload
/// shows up, one consuming fetch of `FETCH_LIMIT` messages drains the queue,
/// taking every other message present at that moment with it.
pub async fn verify_message<S>(
    source: &S,
    content: &str,
    policy: &PollPolicy,
) -> Result<MessageVerdict>
where
    S: QueueSource + ?Sized,
{
    let mut messages = Vec::new();

    for attempt in 1..=policy.max_attempts {
        messages = source.fetch(FETCH_LIMIT, AckMode::AckRequeueTrue).await?;
        debug!(attempt, peeked = messages.len(), "Peeked queue");

        if messages.iter().any(|message| message.payload == content) {
            let drained = source.fetch(FETCH_LIMIT, AckMode::AckRequeueFalse).await?;
            debug!(drained = drained.len(), "Drained queue after match");
            return Ok(MessageVerdict::Found);
        }

        policy.pause_after(attempt).await;
    }

    Ok(MessageVerdict::Missing {
        observed: messages.into_iter().map(|message| message.payload).collect(),
    })
}

/// Wait for the queue to drain to zero messages
pub async fn verify_empty<S>(source: &S, policy: &PollPolicy) -> Result<EmptyVerdict>
where
    S: QueueSource + ?Sized,
{
    let mut count = 0;

    for attempt in 1..=policy.max_attempts {
        count = match source.depth().await? {
            Some(0) => return Ok(EmptyVerdict::Empty),
            Some(count) => count,
            None => return Ok(EmptyVerdict::QueueMissing),
        };
        debug!(attempt, count, "Waiting for queue to drain");

        policy.pause_after(attempt).await;
    }

    Ok(EmptyVerdict::NotEmpty { count })
}
