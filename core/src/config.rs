//! Service tuning.

use std::time::Duration;

/// Limits applied by [`VolunteerHub`](crate::service::VolunteerHub).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HubConfig {
    /// Upper bound on any single store call
    pub store_timeout: Duration,
    /// Read/check/commit rounds a mutation may take before giving up
    pub max_commit_attempts: u32,
}

impl HubConfig {
    /// Default store timeout
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Default commit rounds
    pub const DEFAULT_MAX_COMMIT_ATTEMPTS: u32 = 8;

    /// Override the store timeout
    #[must_use]
    pub const fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Override the commit rounds (at least one round always runs)
    #[must_use]
    pub const fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = if attempts == 0 { 1 } else { attempts };
        self
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
            max_commit_attempts: Self::DEFAULT_MAX_COMMIT_ATTEMPTS,
        }
    }
}
