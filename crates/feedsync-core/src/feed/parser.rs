use feed_rs::parser;

use super::models::FetchedItem;
use crate::{Error, Result};

/// Parse RSS/Atom content into items, keeping the order of the source document.
///
/// Entries without a link cannot be published and are skipped.
pub fn parse_feed(content: &[u8]) -> Result<Vec<FetchedItem>> {
    let feed = parser::parse(content).map_err(|e| Error::Decode(e.to_string()))?;

    let items = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = entry.links.into_iter().next()?.href;
            if link.trim().is_empty() {
                tracing::debug!("Skipping entry {} without a link", entry.id);
                return None;
            }
            Some(FetchedItem {
                link,
                title: entry.title.map(|t| t.content),
            })
        })
        .collect();

    Ok(items)
}
