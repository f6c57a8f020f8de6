use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::ConfigError;

/// Options for a single sitefetch run.
#[derive(Debug, Clone)]
pub struct Options {
    /// Root sitemap URL, the resolution entry point
    pub sitemap_url: String,

    /// Follow `<sitemap>` references in sitemap index documents
    pub recursive: bool,

    /// Fetch-phase semaphore capacity
    pub concurrency_limit: usize,

    /// Per-request deadline, applied uniformly to sitemap and page fetches
    pub request_timeout: Duration,

    /// Cap on the number of page URLs fetched, applied after deduplication
    pub limit: Option<usize>,

    /// Append a random numeric query suffix to each page URL
    pub random: bool,

    /// Decimal digit length of the random suffix (1-100)
    pub random_length: usize,

    /// Credentials sent with every request
    pub basic_auth: Option<BasicAuth>,

    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Store fetched page bodies below this directory
    pub output_dir: Option<PathBuf>,

    /// Store the outcome report as CSV at this path
    pub report_path: Option<PathBuf>,

    /// Response times above this threshold count as slow
    pub slow_threshold: Duration,

    /// How many slow responses the report view exposes
    pub slow_num: SlowLimit,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            sitemap_url: String::new(),
            recursive: true,
            concurrency_limit: 5,
            request_timeout: Duration::from_secs(30),
            limit: None,
            random: false,
            random_length: 15,
            basic_auth: None,
            user_agent: default_user_agent(),
            output_dir: None,
            report_path: None,
            slow_threshold: Duration::from_secs(5),
            slow_num: SlowLimit::Limited(10),
        }
    }
}

/// Default User-Agent string, e.g. `sitefetch/1.0.0`
pub fn default_user_agent() -> String {
    format!("sitefetch/{}", env!("CARGO_PKG_VERSION"))
}

/// Size of the slow-response report view.
///
/// `Limited(0)` suppresses the view entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlowLimit {
    Limited(usize),
    Unlimited,
}

/// Basic auth credentials in `username:password` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl FromStr for BasicAuth {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (username, password) = s.split_once(':').ok_or(ConfigError::InvalidBasicAuth)?;
        if username.is_empty() {
            return Err(ConfigError::InvalidBasicAuth);
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}
