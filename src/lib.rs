//! Sitefetch: fetch a sitemap and retrieve every URL in it
//!
//! This crate resolves a root sitemap (following nested sitemap indexes),
//! fetches every discovered page URL under a bounded concurrency budget and
//! aggregates the outcomes into a report.

pub mod config;
pub mod fetcher;
pub mod output;
pub mod report;
pub mod sitemap;

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sitefetch operations
#[derive(Debug, Error)]
pub enum SitefetchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No URLs could be resolved from {url}")]
    NoUrls { url: String },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Failed to write report to {path}: {source}")]
    ReportExport { path: PathBuf, source: csv::Error },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid sitemap URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Invalid basic auth credentials: expected 'username:password'")]
    InvalidBasicAuth,

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for sitefetch operations
pub type Result<T> = std::result::Result<T, SitefetchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Options, SlowLimit};
pub use fetcher::{run, FetchOutcome, FetchStatus};
pub use report::Report;
pub use sitemap::ResolutionResult;
