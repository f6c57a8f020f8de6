use reqwest::Client;

use crate::config::Options;

/// Builds the HTTP client shared by sitemap resolution and page fetches.
///
/// The timeout covers the whole request including body download, so a
/// server that stalls mid-body still counts as a timeout.
pub fn build_http_client(options: &Options) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&options.user_agent)
        .timeout(options.request_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}
