use std::sync::Arc;

use hashtag_core::catalog::{Catalog, Category};
use hashtag_core::guardian::Guardian;
use hashtag_core::traits::DataSource;
use hashtag_core::types::{HashtagItem, HashtagType, MatchCondition};

pub const ICON: &str = "folder";

pub struct CategoryHashtagDataSource {
    catalog: Arc<Catalog>,
}

impl CategoryHashtagDataSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn to_item(&self, category: &Category) -> HashtagItem {
        let parent = self.catalog.parent_of(category);
        let mut item = HashtagItem::new(category.name.clone(), category.slug.clone(), category.id);
        item.description = category.description.clone();
        item.icon = ICON.to_string();
        item.kind = Some(HashtagType::Category);
        item.reference = Some(self.catalog.slug_ref(category));
        item.relative_url = format!("/c/{}/{}", self.catalog.slug_path(category), category.id);
        item.colors = Some(match parent {
            Some(p) => vec![p.color.clone(), category.color.clone()],
            None => vec![category.color.clone()],
        });
        item
    }

    fn visible<'a>(&'a self, guardian: &'a Guardian) -> impl Iterator<Item = &'a Category> + 'a {
        self.catalog
            .categories
            .iter()
            .filter(move |c| guardian.can_see_category(&self.catalog, c))
    }

    /// `parent:child` or a plain slug; top-level categories win over
    /// subcategories sharing the same slug.
    fn resolve(&self, guardian: &Guardian, slug: &str) -> Option<&Category> {
        let found = match slug.split_once(':') {
            Some((parent, child)) => self.catalog.category_by_slug_path(parent, child),
            None => self
                .catalog
                .categories
                .iter()
                .filter(|c| c.slug.eq_ignore_ascii_case(slug) && guardian.can_see_category(&self.catalog, c))
                .min_by_key(|c| c.parent_category_id.is_some()),
        };
        found.filter(|c| guardian.can_see_category(&self.catalog, c))
    }

    fn by_popularity(mut categories: Vec<&Category>) -> Vec<&Category> {
        categories.sort_by(|a, b| {
            b.topic_count
                .cmp(&a.topic_count)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        categories
    }
}

impl DataSource for CategoryHashtagDataSource {
    fn icon(&self) -> &str {
        ICON
    }

    fn lookup(&self, guardian: &Guardian, slugs: &[String]) -> anyhow::Result<Vec<HashtagItem>> {
        let mut items: Vec<HashtagItem> = Vec::new();
        for slug in slugs {
            if let Some(category) = self.resolve(guardian, slug) {
                if items.iter().any(|i| i.id == category.id) {
                    continue;
                }
                let mut item = self.to_item(category);
                // Echo the key the caller used so a plain `child` stays plain.
                if !slug.contains(':') {
                    item.reference = Some(category.slug.clone());
                }
                items.push(item);
            }
        }
        tracing::trace!(requested = slugs.len(), found = items.len(), "category lookup");
        Ok(items)
    }

    fn search(
        &self,
        guardian: &Guardian,
        term: &str,
        limit: usize,
        condition: MatchCondition,
    ) -> anyhow::Result<Vec<HashtagItem>> {
        let matches: Vec<&Category> = self
            .visible(guardian)
            .filter(|c| condition.matches(&c.name, term) || condition.matches(&c.slug, term))
            .collect();
        Ok(Self::by_popularity(matches)
            .into_iter()
            .take(limit)
            .map(|c| self.to_item(c))
            .collect())
    }

    fn search_without_term(&self, guardian: &Guardian, limit: usize) -> anyhow::Result<Vec<HashtagItem>> {
        Ok(Self::by_popularity(self.visible(guardian).collect())
            .into_iter()
            .take(limit)
            .map(|c| self.to_item(c))
            .collect())
    }

    fn search_sort(&self, mut items: Vec<HashtagItem>, term: &str) -> Vec<HashtagItem> {
        items.sort_by_cached_key(|item| {
            let exact = item.slug.eq_ignore_ascii_case(term) || item.text.eq_ignore_ascii_case(term);
            let is_subcategory = item.reference().contains(':');
            (!exact, is_subcategory, item.text.to_lowercase())
        });
        items
    }

    fn supports_find_by_ids(&self) -> bool {
        true
    }

    fn find_by_ids(&self, guardian: &Guardian, ids: &[u64]) -> anyhow::Result<Vec<HashtagItem>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.catalog.category(*id))
            .filter(|c| guardian.can_see_category(&self.catalog, c))
            .map(|c| self.to_item(c))
            .collect())
    }
}
