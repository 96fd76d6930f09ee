//! Retry cadence shared by every verification loop
//!
//! Delivery from the system under test is asynchronous, so a single read of
//! the queue is racy. Each check re-reads the queue on a fixed cadence until
//! its condition holds or the attempt budget runs out.

use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(200);
/// Consecutive unchanged observations after which a nonzero count is
/// considered stalled
pub const DEFAULT_STALL_THRESHOLD: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total number of observations, including the first
    pub max_attempts: u32,
    /// Pause between two observations
    pub delay: Duration,
    pub stall_threshold: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
            stall_threshold: DEFAULT_STALL_THRESHOLD,
        }
    }
}

impl PollPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            ..Self::default()
        }
    }

    /// Sleep before the next attempt. No-op after the final one.
    pub async fn pause_after(&self, attempt: u32) {
        if attempt < self.max_attempts && !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

/// Detects a queue count that stopped moving short of its target
///
/// Every observation equal to the previous one bumps a repeat counter, any
/// change resets it. The count is stalled once the counter reaches the
/// threshold while the count is nonzero; a queue that has received nothing
/// yet is never considered stalled.
#[derive(Debug, Clone)]
pub struct StallDetector {
    last: Option<u64>,
    repeats: u32,
    threshold: u32,
}

impl StallDetector {
    pub fn new(threshold: u32) -> Self {
        Self {
            last: None,
            repeats: 0,
            threshold,
        }
    }

    /// Record an observation and report whether the count has stalled
    pub fn observe(&mut self, count: u64) -> bool {
        if self.last == Some(count) {
            self.repeats += 1;
            self.repeats >= self.threshold && count > 0
        } else {
            self.repeats = 0;
            self.last = Some(count);
            false
        }
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }
}
