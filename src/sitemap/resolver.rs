//! Recursive sitemap resolver
//!
//! Walks a sitemap index tree depth-first and collects every page URL.
//! Each document is fetched and parsed on its own; a node that errors
//! (HTTP error, connection failure, timeout, unparsable XML) contributes
//! nothing while the rest of the tree is still walked. Documents are
//! fetched strictly one at a time; bounded concurrency applies only to
//! the page fetch phase.

use std::collections::HashSet;

use reqwest::{Client, StatusCode};

use crate::config::Options;

/// Outcome of resolving one root sitemap.
#[derive(Debug, Clone, Default)]
pub struct ResolutionResult {
    /// Deduplicated page URLs in first-discovered order
    pub urls: Vec<String>,

    /// Number of sitemap documents successfully parsed during the walk
    pub documents_parsed: usize,
}

/// Resolves sitemap trees into a flat page URL set.
pub struct Resolver<'a> {
    client: &'a Client,
    options: &'a Options,
}

impl<'a> Resolver<'a> {
    pub fn new(client: &'a Client, options: &'a Options) -> Self {
        Self { client, options }
    }

    /// Resolves `root_url` and returns the deduplicated page URL set.
    ///
    /// With `recursive` disabled, only the root document is fetched and
    /// any `<sitemap>` entries it contains are ignored.
    pub async fn resolve(&self, root_url: &str) -> ResolutionResult {
        let mut result = ResolutionResult::default();
        let mut seen = HashSet::new();
        let mut visited_documents = HashSet::new();

        // Explicit stack, children pushed in reverse, so the walk visits
        // sub-sitemaps depth-first in document order.
        let mut pending = vec![root_url.to_string()];

        while let Some(url) = pending.pop() {
            // Each document is fetched at most once; this also terminates
            // the walk when indexes reference each other in a cycle.
            if !visited_documents.insert(url.clone()) {
                continue;
            }

            let document = match self.fetch_document(&url).await {
                Some(d) => d,
                None => continue,
            };

            result.documents_parsed += 1;

            for page_url in document.urls {
                if seen.insert(page_url.clone()) {
                    result.urls.push(page_url);
                }
            }

            if self.options.recursive {
                for sub_sitemap in document.sitemaps.into_iter().rev() {
                    pending.push(sub_sitemap);
                }
            } else if !document.sitemaps.is_empty() {
                tracing::info!(
                    "Skipping {} sub-sitemap(s) of {} (recursive resolution disabled)",
                    document.sitemaps.len(),
                    url
                );
            }
        }

        result
    }

    /// Fetches and parses a single sitemap document.
    ///
    /// Every failure is reported as a diagnostic and yields `None`; the
    /// caller carries on with the remaining branches.
    async fn fetch_document(&self, url: &str) -> Option<super::SitemapDocument> {
        let mut request = self.client.get(url);
        if let Some(auth) = &self.options.basic_auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                tracing::warn!("Timeout while fetching sitemap {}", url);
                return None;
            }
            Err(e) => {
                tracing::warn!("Connection error while fetching sitemap {}: {}", url, e);
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Unable to fetch sitemap {}: authorization error", url);
            return None;
        }
        if !status.is_success() {
            tracing::warn!("Unable to fetch sitemap {}: HTTP {}", url, status.as_u16());
            return None;
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Failed to read sitemap body from {}: {}", url, e);
                return None;
            }
        };

        match super::parse_sitemap(&body) {
            Ok(document) => Some(document),
            Err(e) => {
                tracing::warn!("Unable to parse sitemap {}: {}", url, e);
                None
            }
        }
    }
}
