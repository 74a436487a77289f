//! HTML directory listing extraction with per-URL memoization
//!
//! The remote tree is assumed immutable during a run, so every listing is
//! cached for the process lifetime keyed by the exact URL fetched.

use std::collections::HashMap;

use scraper::{Html, Selector};
use tracing::trace;

use crate::error::{QtdlError, QtdlResult};
use crate::remote::Fetch;

/// Fetches and parses directory index pages, memoizing results
pub struct DirectoryLister<F: Fetch> {
    fetcher: F,
    cache: HashMap<String, Vec<String>>,
}

impl<F: Fetch> DirectoryLister<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: HashMap::new(),
        }
    }

    /// List the child directory names under `url`, in page order.
    ///
    /// Skips the first two table rows (header and parent link), skips
    /// absolute-path anchors, keeps only entries ending in `/` with the
    /// trailing slash stripped. A page without a listing table is a parse
    /// error; a failed fetch aborts the branch (no retries).
    pub fn list(&mut self, url: &str) -> QtdlResult<Vec<String>> {
        if let Some(hit) = self.cache.get(url) {
            trace!(url, "listing cache hit");
            return Ok(hit.clone());
        }

        let body = self.fetcher.get(url)?;
        let entries = parse_listing(&body)
            .map_err(|reason| QtdlError::parse("directory listing", url, reason))?;
        self.cache.insert(url.to_string(), entries.clone());
        Ok(entries)
    }

    /// Fetch a non-listing resource (Updates.xml) through the same seam.
    pub fn fetch_text(&self, url: &str) -> QtdlResult<String> {
        self.fetcher.get(url)
    }
}

fn parse_listing(html: &str) -> Result<Vec<String>, String> {
    let table = Selector::parse("table").expect("static selector");
    let rows = Selector::parse("table tr").expect("static selector");
    let anchor = Selector::parse("a").expect("static selector");

    let document = Html::parse_document(html);
    if document.select(&table).next().is_none() {
        return Err("no listing table in page".to_string());
    }

    let mut entries = Vec::new();
    for row in document.select(&rows).skip(2) {
        let Some(link) = row.select(&anchor).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if href.starts_with('/') {
            continue;
        }
        if let Some(dir) = href.strip_suffix('/') {
            if !dir.is_empty() {
                entries.push(dir.to_string());
            }
        }
    }
    Ok(entries)
}
