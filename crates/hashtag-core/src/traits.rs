use crate::guardian::Guardian;
use crate::types::{HashtagItem, MatchCondition};

/// One hashtag-able entity type.
///
/// Implementations must apply the guardian's visibility rules themselves;
/// the engine never filters what a source returns. `lookup` and the search
/// methods are expected to be side-effect free.
pub trait DataSource: Send + Sync {
    fn icon(&self) -> &str;

    fn enabled(&self) -> bool {
        true
    }

    /// Exact resolution. Each returned item answers to one of `slugs` through
    /// its `ref` (or its `slug` when no ref is set).
    fn lookup(&self, guardian: &Guardian, slugs: &[String]) -> anyhow::Result<Vec<HashtagItem>>;

    /// Up to `limit` candidates for a lowercase `term`.
    fn search(
        &self,
        guardian: &Guardian,
        term: &str,
        limit: usize,
        condition: MatchCondition,
    ) -> anyhow::Result<Vec<HashtagItem>>;

    fn search_without_term(&self, guardian: &Guardian, limit: usize) -> anyhow::Result<Vec<HashtagItem>>;

    fn search_sort(&self, items: Vec<HashtagItem>, term: &str) -> Vec<HashtagItem>;

    fn supports_find_by_ids(&self) -> bool {
        false
    }

    fn find_by_ids(&self, _guardian: &Guardian, _ids: &[u64]) -> anyhow::Result<Vec<HashtagItem>> {
        Ok(Vec::new())
    }
}
