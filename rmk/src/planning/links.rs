//! Shopping search links

use tracing::debug;

use crate::config::{PlatformTemplate, QUERY_PLACEHOLDER};
use crate::domain::{PlannedItem, ShoppingLink, SuggestedItem};

/// Builds deterministic search URLs for each configured platform
#[derive(Debug, Clone)]
pub struct LinkSynthesizer {
    platforms: Vec<PlatformTemplate>,
}

impl LinkSynthesizer {
    pub fn new(platforms: Vec<PlatformTemplate>) -> Self {
        debug!(count = platforms.len(), "LinkSynthesizer::new: called");
        Self { platforms }
    }

    /// Percent-encode each search word and join the words with `+`
    pub fn query(item: &SuggestedItem) -> String {
        item.search_terms()
            .iter()
            .flat_map(|term| term.split_whitespace())
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join("+")
    }

    pub fn links_for(&self, item: &SuggestedItem) -> Vec<ShoppingLink> {
        let query = Self::query(item);
        debug!(name = %item.name, %query, "LinkSynthesizer::links_for: called");
        self.platforms
            .iter()
            .map(|platform| ShoppingLink {
                platform: platform.name.clone(),
                url: platform.url_template.replace(QUERY_PLACEHOLDER, &query),
            })
            .collect()
    }

    /// Attach links to every item, preserving order
    pub fn attach(&self, items: Vec<SuggestedItem>) -> Vec<PlannedItem> {
        items
            .into_iter()
            .map(|item| PlannedItem {
                shopping_links: self.links_for(&item),
                item,
            })
            .collect()
    }
}
