//! Semaphore-gated fetch engine
//!
//! Every page URL becomes one task; a shared semaphore keeps at most
//! `concurrency_limit` requests in flight. A permit is held through the
//! whole fetch including body download and persistence, and is released
//! on every exit path when the task's guard drops.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{BasicAuth, Options};
use crate::output::persist_body;

use super::{FetchOutcome, FetchStatus};

/// Fetches all `urls` with at most `options.concurrency_limit` requests
/// in flight, returning one outcome per URL in completion order.
///
/// Individual failures never abort the run; they become `Timeout` or
/// `Failed` outcomes.
pub async fn fetch_all(client: &Client, urls: Vec<String>, options: &Options) -> Vec<FetchOutcome> {
    let semaphore = Arc::new(Semaphore::new(options.concurrency_limit));
    let mut tasks = JoinSet::new();

    for url in urls {
        let semaphore = Arc::clone(&semaphore);
        let client = client.clone();
        let basic_auth = options.basic_auth.clone();
        let cache_buster = options.random.then_some(options.random_length);
        let output_dir = options.output_dir.clone();

        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition cannot fail.
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("fetch semaphore closed");
            fetch_one(&client, url, basic_auth, cache_buster, output_dir).await
        });
    }

    let mut outcomes = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => {
                tracing::info!(
                    "{:>3} {} ({:.3}s)",
                    outcome.status_code(),
                    outcome.url,
                    outcome.response_time.as_secs_f64()
                );
                outcomes.push(outcome);
            }
            Err(e) => tracing::error!("Fetch task failed to complete: {}", e),
        }
    }
    outcomes
}

/// Fetches a single page and classifies the result.
async fn fetch_one(
    client: &Client,
    url: String,
    basic_auth: Option<BasicAuth>,
    cache_buster: Option<usize>,
    output_dir: Option<PathBuf>,
) -> FetchOutcome {
    let request_url = match cache_buster {
        Some(length) => with_cache_buster(&url, length),
        None => url,
    };

    let mut request = client.get(&request_url);
    if let Some(auth) = &basic_auth {
        request = request.basic_auth(&auth.username, Some(&auth.password));
    }

    let start = Instant::now();
    let response = match request.send().await {
        Ok(r) => r,
        Err(e) if e.is_timeout() => {
            return FetchOutcome {
                url: request_url,
                status: FetchStatus::Timeout,
                response_time: start.elapsed(),
            };
        }
        Err(e) => {
            tracing::warn!("Failed to fetch {}: {}", request_url, e);
            return FetchOutcome {
                url: request_url,
                status: FetchStatus::Failed,
                response_time: start.elapsed(),
            };
        }
    };

    let status = response.status().as_u16();
    let body = response.bytes().await;
    let response_time = start.elapsed();

    match body {
        Ok(body) => {
            // Error responses are persisted too; any completed answer has
            // a body worth keeping.
            if let Some(dir) = &output_dir {
                if let Err(e) = persist_body(dir, &request_url, &body).await {
                    tracing::warn!("Failed to persist {}: {}", request_url, e);
                }
            }
        }
        Err(e) if e.is_timeout() => {
            return FetchOutcome {
                url: request_url,
                status: FetchStatus::Timeout,
                response_time,
            };
        }
        Err(e) => tracing::warn!("Failed to read body from {}: {}", request_url, e),
    }

    FetchOutcome {
        url: request_url,
        status: FetchStatus::Http(status),
        response_time,
    }
}

/// Appends a random all-digit query suffix, e.g. `?429071593262611`, so
/// requests bypass URL-keyed frontend caches.
fn with_cache_buster(url: &str, length: usize) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}{}", random_digits(length))
}

fn random_digits(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|i| {
            // No leading zero, so the suffix always has `length` digits.
            let digit = if i == 0 {
                rng.gen_range(1..=9u32)
            } else {
                rng.gen_range(0..=9u32)
            };
            char::from_digit(digit, 10).unwrap_or('0')
        })
        .collect()
}
