//! Runtime settings for the settlement service.

use std::time::Duration as StdDuration;

use chrono::Duration;

use crate::constants::{DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_MERGE_WINDOW_HOURS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementSettings {
    /// A buy dated less than this after the latest open lot is merged into it.
    pub merge_window: Duration,
    /// Deadline for one whole settlement action.
    pub action_timeout: StdDuration,
}

impl Default for SettlementSettings {
    fn default() -> Self {
        Self {
            merge_window: Duration::hours(DEFAULT_MERGE_WINDOW_HOURS),
            action_timeout: StdDuration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
        }
    }
}

impl SettlementSettings {
    pub fn with_merge_window(mut self, merge_window: Duration) -> Self {
        self.merge_window = merge_window;
        self
    }

    pub fn with_action_timeout(mut self, action_timeout: StdDuration) -> Self {
        self.action_timeout = action_timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SettlementSettings::default();
        assert_eq!(settings.merge_window, Duration::hours(24));
        assert_eq!(settings.action_timeout, StdDuration::from_secs(30));

        let tuned = settings.with_merge_window(Duration::hours(1));
        assert_eq!(tuned.merge_window, Duration::hours(1));
        assert_eq!(tuned.action_timeout, settings.action_timeout);
    }
}
