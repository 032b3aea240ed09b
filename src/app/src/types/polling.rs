use serde::{Deserialize, Serialize};

/// Consecutive failed polls after which polling stops for good
pub const MAX_RETRIES: u32 = 60;

/// Pause between the end of one poll and the start of the next
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Lifecycle of the status poll loop
///
/// `Stopped` is terminal: nothing moves the loop back to `Polling`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PollingState {
    #[default]
    Idle,
    Polling,
    Stopped,
}

impl PollingState {
    pub fn is_stopped(&self) -> bool {
        matches!(self, PollingState::Stopped)
    }
}

/// Count of consecutive poll failures since the last success
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryCounter {
    count: u32,
}

impl RetryCounter {
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Record a failed poll. Saturates at `MAX_RETRIES`.
    pub fn record_failure(&mut self) {
        self.count = (self.count + 1).min(MAX_RETRIES);
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn is_exhausted(&self) -> bool {
        self.count >= MAX_RETRIES
    }
}
