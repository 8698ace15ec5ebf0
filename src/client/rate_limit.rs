//! Proactive quota guard for the GitHub API
//!
//! Before each quota-consuming call the guard probes `/rate_limit`. When fewer
//! than `low_water_mark` requests remain it waits until the quota resets, plus
//! a safety margin; if that instant has already passed it proceeds at once.
//! A failed probe never blocks the call it guards.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use super::GitHubApi;
use crate::clock::Clock;

/// Remaining-request threshold below which calls wait for a reset
pub const DEFAULT_LOW_WATER_MARK: u32 = 10;

/// Extra wait added after the advertised reset instant
pub const DEFAULT_SAFETY_MARGIN: Duration = Duration::from_secs(10);

/// Waits out an almost exhausted quota before issuing requests.
#[derive(Clone)]
pub struct RateLimitGuard {
    clock: Arc<dyn Clock>,
    low_water_mark: u32,
    safety_margin: Duration,
}

impl RateLimitGuard {
    pub fn new(clock: Arc<dyn Clock>, low_water_mark: u32, safety_margin: Duration) -> Self {
        Self {
            clock,
            low_water_mark,
            safety_margin,
        }
    }

    /// Guard with the default threshold and margin
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(clock, DEFAULT_LOW_WATER_MARK, DEFAULT_SAFETY_MARGIN)
    }

    /// Probe the quota and sleep if it is nearly exhausted.
    ///
    /// Returns how long it waited.
    pub async fn ensure_capacity(&self, api: &dyn GitHubApi) -> Duration {
        let state = match api.rate_limit().await {
            Ok(state) => state,
            Err(e) => {
                debug!("Rate limit probe failed, proceeding: {}", e);
                return Duration::ZERO;
            }
        };

        if state.remaining >= self.low_water_mark {
            return Duration::ZERO;
        }

        let resume_at = state.reset_at
            + chrono::Duration::from_std(self.safety_margin).unwrap_or_default();
        let wait = (resume_at - self.clock.now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        if wait.is_zero() {
            return Duration::ZERO;
        }

        warn!(
            "GitHub quota nearly exhausted ({} of {} left), waiting {}s for reset",
            state.remaining,
            state.limit,
            wait.as_secs()
        );
        self.clock.sleep(wait).await;
        wait
    }
}
