//! On-disk storage of fetched page bodies
//!
//! Each page lands at a path derived from its URL path. Persistence is
//! best effort: callers log failures and keep fetching.

use std::path::{Path, PathBuf};

use url::Url;

/// Derives the relative storage path for a page URL.
///
/// The URL path is stripped of leading and trailing slashes; an empty
/// path becomes `index`. `..` components are dropped so a hostile
/// sitemap cannot escape the output directory. A final component
/// without an extension gets `.html` appended.
///
/// Returns `None` when the URL does not parse.
pub fn document_path(url: &str) -> Option<PathBuf> {
    let parsed = Url::parse(url).ok()?;

    let components: Vec<&str> = parsed
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|c| !c.is_empty() && *c != "..")
        .collect();

    let mut path = PathBuf::new();
    for component in &components {
        path.push(component);
    }

    let file_name = match components.last() {
        Some(name) => *name,
        None => {
            path.push("index");
            "index"
        }
    };
    if !file_name.contains('.') {
        path.set_extension("html");
    }

    Some(path)
}

/// Writes `body` under `output_dir` at the path derived from `url`,
/// creating intermediate directories as needed.
pub async fn persist_body(output_dir: &Path, url: &str, body: &[u8]) -> std::io::Result<PathBuf> {
    let relative = document_path(url).ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("cannot derive storage path for {url}"),
        )
    })?;

    let target = output_dir.join(&relative);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&target, body).await?;
    tracing::debug!("Stored {} at {}", url, target.display());
    Ok(target)
}
