//! In-memory queue for exercising the verification loops

use crate::verify::QueueSource;
use async_trait::async_trait;
use broker_mgmt_client::{
    AckMode,
    Message,
    Result,
};
use std::{
    collections::VecDeque,
    sync::Mutex,
};

#[derive(Default)]
struct State {
    /// Depth answers in order; the last one repeats forever
    depths: VecDeque<Option<u64>>,
    depth_calls: usize,
    payloads: Vec<String>,
    fetch_log: Vec<(u32, AckMode)>,
    pending: Option<(usize, String)>,
}

/// A queue that answers from a script instead of a broker
#[derive(Default)]
pub struct ScriptedQueue {
    state: Mutex<State>,
}

impl ScriptedQueue {
    pub fn with_depths(depths: impl IntoIterator<Item = Option<u64>>) -> Self {
        let queue = Self::default();
        queue.state.lock().unwrap().depths = depths.into_iter().collect();
        queue
    }

    pub fn with_payloads<P: Into<String>>(payloads: impl IntoIterator<Item = P>) -> Self {
        let queue = Self::default();
        queue.state.lock().unwrap().payloads = payloads.into_iter().map(Into::into).collect();
        queue
    }

    /// Make `payload` visible starting with fetch number `fetches + 1`
    pub fn deliver_after_fetches(&self, fetches: usize, payload: &str) {
        self.state.lock().unwrap().pending = Some((fetches, payload.to_string()));
    }

    pub fn depth_calls(&self) -> usize {
        self.state.lock().unwrap().depth_calls
    }

    pub fn fetch_log(&self) -> Vec<(u32, AckMode)> {
        self.state.lock().unwrap().fetch_log.clone()
    }

    pub fn payloads(&self) -> Vec<String> {
        self.state.lock().unwrap().payloads.clone()
    }
}

#[async_trait]
impl QueueSource for ScriptedQueue {
    async fn depth(&self) -> Result<Option<u64>> {
        let mut state = self.state.lock().unwrap();
        state.depth_calls += 1;
        let answer = if state.depths.len() > 1 {
            state.depths.pop_front().flatten()
        } else {
            state.depths.front().copied().flatten()
        };
        Ok(answer)
    }

    async fn fetch(&self, count: u32, ackmode: AckMode) -> Result<Vec<Message>> {
        let mut state = self.state.lock().unwrap();
        state.fetch_log.push((count, ackmode));

        let fetches = state.fetch_log.len();
        if state.pending.as_ref().is_some_and(|(after, _)| fetches > *after) {
            if let Some((_, payload)) = state.pending.take() {
                state.payloads.push(payload);
            }
        }

        let take = state.payloads.len().min(count as usize);
        let batch: Vec<String> = match ackmode {
            AckMode::AckRequeueTrue => state.payloads[..take].to_vec(),
            AckMode::AckRequeueFalse => state.payloads.drain(..take).collect(),
        };

        Ok(batch
            .into_iter()
            .map(|payload| {
                Message {
                    payload,
                    ..Message::default()
                }
            })
            .collect())
    }
}
