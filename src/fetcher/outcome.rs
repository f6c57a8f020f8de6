use std::time::Duration;

/// How a single page fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The server answered; any status code counts, errors included.
    Http(u16),

    /// The request exceeded the configured timeout.
    Timeout,

    /// A transport failure before any status line arrived (DNS,
    /// connection refused, TLS).
    Failed,
}

/// The result of fetching one page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The URL as requested, cache-buster suffix included when one was
    /// appended.
    pub url: String,

    pub status: FetchStatus,

    /// Wall time from sending the request to the last body byte.
    pub response_time: Duration,
}

impl FetchOutcome {
    pub fn is_timeout(&self) -> bool {
        self.status == FetchStatus::Timeout
    }

    /// True for 4xx/5xx answers, timeouts and transport failures. The
    /// client follows redirects, so 3xx only surfaces on redirect loops
    /// and is not counted here.
    pub fn is_error(&self) -> bool {
        match self.status {
            FetchStatus::Http(code) => code >= 400,
            FetchStatus::Timeout | FetchStatus::Failed => true,
        }
    }

    /// Numeric projection for CSV and console rendering: timeouts show
    /// as 408, transport failures as 0.
    pub fn status_code(&self) -> u16 {
        match self.status {
            FetchStatus::Http(code) => code,
            FetchStatus::Timeout => 408,
            FetchStatus::Failed => 0,
        }
    }
}
