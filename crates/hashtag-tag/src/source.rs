use std::cmp::Reverse;
use std::sync::Arc;

use hashtag_core::catalog::{Catalog, Tag};
use hashtag_core::guardian::Guardian;
use hashtag_core::traits::DataSource;
use hashtag_core::types::{HashtagItem, HashtagType, MatchCondition};

pub const ICON: &str = "tag";

/// Tags as hashtags. Disabled entirely when tagging is switched off.
pub struct TagHashtagDataSource {
    catalog: Arc<Catalog>,
    tagging_enabled: bool,
}

impl TagHashtagDataSource {
    pub fn new(catalog: Arc<Catalog>, tagging_enabled: bool) -> Self {
        Self { catalog, tagging_enabled }
    }

    fn to_item(tag: &Tag) -> HashtagItem {
        let mut item = HashtagItem::new(tag.name.clone(), tag.name.clone(), tag.id);
        item.secondary_text = Some(format!("x{}", tag.topic_count));
        item.description = tag.description.clone();
        item.icon = ICON.to_string();
        item.kind = Some(HashtagType::Tag);
        item.relative_url = format!("/tag/{}", tag.name);
        item
    }

    fn topic_count(&self, id: u64) -> u64 {
        self.catalog.tag(id).map_or(0, |t| t.topic_count)
    }

    fn ranked<'a>(&'a self, guardian: &Guardian, keep: impl Fn(&Tag) -> bool) -> Vec<&'a Tag> {
        let mut tags: Vec<&Tag> = self
            .catalog
            .tags
            .iter()
            .filter(|t| guardian.can_see_tag(t) && keep(*t))
            .collect();
        tags.sort_by_key(|t| (Reverse(t.topic_count), t.name.to_lowercase()));
        tags
    }
}

impl DataSource for TagHashtagDataSource {
    fn icon(&self) -> &str {
        ICON
    }

    fn enabled(&self) -> bool {
        self.tagging_enabled
    }

    fn lookup(&self, guardian: &Guardian, slugs: &[String]) -> anyhow::Result<Vec<HashtagItem>> {
        let items: Vec<HashtagItem> = self
            .catalog
            .tags
            .iter()
            .filter(|t| guardian.can_see_tag(t))
            .filter(|t| slugs.iter().any(|s| s.eq_ignore_ascii_case(&t.name)))
            .map(Self::to_item)
            .collect();
        tracing::trace!(requested = slugs.len(), found = items.len(), "tag lookup");
        Ok(items)
    }

    fn search(
        &self,
        guardian: &Guardian,
        term: &str,
        limit: usize,
        condition: MatchCondition,
    ) -> anyhow::Result<Vec<HashtagItem>> {
        Ok(self
            .ranked(guardian, |t| condition.matches(&t.name, term))
            .into_iter()
            .take(limit)
            .map(Self::to_item)
            .collect())
    }

    fn search_without_term(&self, guardian: &Guardian, limit: usize) -> anyhow::Result<Vec<HashtagItem>> {
        Ok(self
            .ranked(guardian, |t| !guardian.has_muted_tag(t.id))
            .into_iter()
            .take(limit)
            .map(Self::to_item)
            .collect())
    }

    fn search_sort(&self, mut items: Vec<HashtagItem>, term: &str) -> Vec<HashtagItem> {
        items.sort_by_cached_key(|item| {
            (
                !item.slug.eq_ignore_ascii_case(term),
                Reverse(self.topic_count(item.id)),
                item.text.to_lowercase(),
            )
        });
        items
    }

    fn supports_find_by_ids(&self) -> bool {
        true
    }

    fn find_by_ids(&self, guardian: &Guardian, ids: &[u64]) -> anyhow::Result<Vec<HashtagItem>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.catalog.tag(*id))
            .filter(|t| guardian.can_see_tag(t))
            .map(Self::to_item)
            .collect())
    }
}
