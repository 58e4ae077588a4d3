//! Link enumeration from journal index pages
//!
//! Each index page lists its articles as `dl dt` entries inside the page's
//! body container. The enumerator reads only that first page: no pagination,
//! no dedup, document order preserved.

use scraper::{Html, Selector};

use crate::types::{JournalTag, LinkDirector};

/// Enumerate the article links on an index page, in document order.
///
/// Entries without an anchor or without an href are skipped. A page that
/// matches nothing yields an empty list, never an error.
pub fn enumerate_links(html: &str, journal: JournalTag) -> Vec<LinkDirector> {
    let document = Html::parse_document(html);

    let entry_selector = match Selector::parse("div.bodytext dl dt") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };
    let anchor_selector = match Selector::parse("a") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&entry_selector)
        .filter_map(|entry| {
            let href = entry
                .select(&anchor_selector)
                .next()
                .and_then(|a| a.value().attr("href"))?;
            Some(LinkDirector {
                url: href.to_string(),
                journal,
            })
        })
        .collect()
}
