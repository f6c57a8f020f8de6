//! Page fetching under a bounded concurrency budget
//!
//! This module contains the fetch phase of a run:
//! - Building the shared HTTP client
//! - The semaphore-gated fetch engine
//! - Outcome classification per URL
//! - The top-level `run` orchestration

mod client;
mod engine;
mod outcome;

pub use client::build_http_client;
pub use engine::fetch_all;
pub use outcome::{FetchOutcome, FetchStatus};

use std::time::Instant;

use crate::config::{self, Options};
use crate::report::Report;
use crate::sitemap::Resolver;
use crate::{Result, SitefetchError};

/// Runs a complete sitefetch operation: resolve the sitemap tree, fetch
/// every page URL and assemble the report.
///
/// Resolving zero page URLs (every branch errored, or the root is an
/// index and recursion is disabled) is a fatal error; the fetch phase
/// does not run.
pub async fn run(options: &Options) -> Result<Report> {
    config::validate(options)?;

    let client = build_http_client(options)?;

    let resolution = Resolver::new(&client, options)
        .resolve(&options.sitemap_url)
        .await;
    tracing::info!(
        "Resolved {} unique URL(s) from {} sitemap document(s)",
        resolution.urls.len(),
        resolution.documents_parsed
    );

    if resolution.urls.is_empty() {
        return Err(SitefetchError::NoUrls {
            url: options.sitemap_url.clone(),
        });
    }

    // First-discovered order is stable, so truncation is deterministic.
    let mut urls = resolution.urls;
    if let Some(limit) = options.limit {
        urls.truncate(limit);
    }

    let start = Instant::now();
    let outcomes = fetch_all(&client, urls, options).await;
    let total_time = start.elapsed();

    Ok(Report {
        root_url: options.sitemap_url.clone(),
        concurrency_limit: options.concurrency_limit,
        limit: options.limit,
        total_time,
        outcomes,
    })
}
