use url::Url;

use crate::config::Options;
use crate::ConfigError;

/// Validates a full option set before a run starts.
///
/// Structurally invalid input fails fast here rather than degrading
/// somewhere in the middle of a fetch.
pub fn validate(options: &Options) -> Result<(), ConfigError> {
    validate_sitemap_url(&options.sitemap_url)?;

    if options.concurrency_limit < 1 {
        return Err(ConfigError::Validation(
            "concurrency_limit must be >= 1".to_string(),
        ));
    }

    if options.request_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "request_timeout must be greater than zero".to_string(),
        ));
    }

    if options.limit == Some(0) {
        return Err(ConfigError::Validation(
            "limit must be >= 1 when given".to_string(),
        ));
    }

    if options.random_length < 1 || options.random_length > 100 {
        return Err(ConfigError::Validation(format!(
            "random_length must be between 1 and 100, got {}",
            options.random_length
        )));
    }

    if options.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates that the root URL is an absolute http(s) URL
fn validate_sitemap_url(url: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl {
            url: url.to_string(),
            message: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(())
}
