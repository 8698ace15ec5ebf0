//! Rate limit quota model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Core REST quota as reported by `/rate_limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}
