//! Sitemap XML parser
//!
//! Extracts `<sitemap><loc>` and `<url><loc>` entries from a single
//! document. Matching is namespace-agnostic (local tag names only), so
//! `sitemapindex` documents with any of the usual sitemap namespaces parse
//! the same way. quick-xml's pull reader performs no external entity
//! expansion, so hostile documents cannot pull in outside content.

use quick_xml::events::Event;
use quick_xml::Reader;

/// The direct children of one sitemap document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `<sitemap><loc>` entries referencing other sitemap documents
    pub sitemaps: Vec<String>,

    /// `<url><loc>` entries referencing pages
    pub urls: Vec<String>,
}

impl SitemapDocument {
    pub fn is_empty(&self) -> bool {
        self.sitemaps.is_empty() && self.urls.is_empty()
    }
}

/// Parses raw bytes as sitemap XML.
///
/// A document without a `urlset` or `sitemapindex` root element (for
/// example a bare XML declaration) is a parse failure, not an empty
/// document.
pub fn parse_sitemap(content: &[u8]) -> Result<SitemapDocument, String> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(true);

    let mut document = SitemapDocument::default();
    let mut buf = Vec::new();

    let mut saw_root = false;
    let mut entry: Option<EntryKind> = None;
    // Element nesting depth inside the open entry; only a `<loc>` at
    // depth 1 (a direct child) names the entry. This keeps extension
    // elements like `<image:image><image:loc>` out of the result.
    let mut entry_depth = 0usize;
    let mut in_loc = false;
    let mut current_loc: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if entry.is_some() {
                    entry_depth += 1;
                    // Unprefixed `loc` only; the first one per entry wins.
                    if e.name().as_ref() == b"loc" && entry_depth == 1 && current_loc.is_none() {
                        in_loc = true;
                    }
                } else {
                    match e.local_name().as_ref() {
                        b"urlset" | b"sitemapindex" => saw_root = true,
                        b"sitemap" => {
                            entry = Some(EntryKind::Sitemap);
                            entry_depth = 0;
                            current_loc = None;
                        }
                        b"url" => {
                            entry = Some(EntryKind::Url);
                            entry_depth = 0;
                            current_loc = None;
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::End(e)) => {
                if let Some(kind) = entry {
                    if entry_depth == 0 && e.local_name().as_ref() == kind.tag() {
                        if let Some(loc) = current_loc.take() {
                            match kind {
                                EntryKind::Sitemap => document.sitemaps.push(loc),
                                EntryKind::Url => document.urls.push(loc),
                            }
                        }
                        entry = None;
                    } else if entry_depth > 0 {
                        in_loc = false;
                        entry_depth -= 1;
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if in_loc {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    let text = text.trim();
                    if !text.is_empty() {
                        current_loc = Some(text.to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("XML error at byte {}: {e}", reader.buffer_position())),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err("document has no urlset or sitemapindex element".to_string());
    }

    Ok(document)
}

#[derive(Debug, Clone, Copy)]
enum EntryKind {
    Sitemap,
    Url,
}

impl EntryKind {
    fn tag(self) -> &'static [u8] {
        match self {
            EntryKind::Sitemap => b"sitemap",
            EntryKind::Url => b"url",
        }
    }
}
