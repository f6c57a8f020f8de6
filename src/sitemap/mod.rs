//! Sitemap document parsing and recursive resolution
//!
//! The parser turns one XML document into its `<sitemap>` and `<url>`
//! locations; the resolver walks sitemap index trees depth-first and
//! collects the flattened page URL set.

mod parser;
mod resolver;

pub use parser::{parse_sitemap, SitemapDocument};
pub use resolver::{ResolutionResult, Resolver};
