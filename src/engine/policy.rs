use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Waiting and stopping budgets for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Scans before a single-post lookup gives up (default: 5)
    pub lookup_attempts: u32,

    /// Pause between lookup scans in milliseconds (default: 1000)
    pub lookup_interval_ms: u64,

    /// Pause after each scroll for lazy content to render, in milliseconds (default: 2000)
    pub settle_delay_ms: u64,

    /// Consecutive scrolls without height growth before collection stops (default: 5)
    pub max_stale_scrolls: u32,

    /// Consecutive non-pinned posts older than the window before collection stops (default: 3)
    pub max_consecutive_old: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            lookup_attempts: 5,
            lookup_interval_ms: 1000,
            settle_delay_ms: 2000,
            max_stale_scrolls: 5,
            max_consecutive_old: 3,
        }
    }
}

impl RetryPolicy {
    pub fn lookup_interval(&self) -> Duration {
        Duration::from_millis(self.lookup_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Same budgets with every pause removed.
    pub fn immediate() -> Self {
        Self {
            lookup_interval_ms: 0,
            settle_delay_ms: 0,
            ..Default::default()
        }
    }
}
