//! Run report aggregation
//!
//! The report owns the raw per-URL outcomes; views over them (failures,
//! slow responses) are computed on demand so renderers can slice the
//! same data differently.

use std::time::Duration;

use crate::config::SlowLimit;
use crate::fetcher::FetchOutcome;

/// Aggregated result of one complete run.
#[derive(Debug, Clone)]
pub struct Report {
    /// The root sitemap URL the run started from
    pub root_url: String,

    /// Concurrency budget the run used
    pub concurrency_limit: usize,

    /// URL cap, when one was configured
    pub limit: Option<usize>,

    /// Wall time of the fetch phase
    pub total_time: Duration,

    /// One outcome per fetched URL, in completion order
    pub outcomes: Vec<FetchOutcome>,
}

impl Report {
    /// Outcomes that ended in an error status, timeout or transport
    /// failure, in completion order.
    pub fn failed(&self) -> Vec<&FetchOutcome> {
        self.outcomes.iter().filter(|o| o.is_error()).collect()
    }

    /// Outcomes slower than `threshold`, slowest first, capped by `limit`.
    ///
    /// Timeouts are excluded; they are failures, not slow successes.
    pub fn slow(&self, threshold: Duration, limit: SlowLimit) -> Vec<&FetchOutcome> {
        let mut slow: Vec<&FetchOutcome> = self
            .outcomes
            .iter()
            .filter(|o| !o.is_timeout() && o.response_time > threshold)
            .collect();
        slow.sort_by(|a, b| b.response_time.cmp(&a.response_time));

        if let SlowLimit::Limited(n) = limit {
            slow.truncate(n);
        }
        slow
    }
}
