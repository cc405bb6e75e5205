//! Hashtag resolution and autocomplete ranking across data sources.
//!
//! Sources are consulted strictly in the caller's priority order and the
//! engine stops as soon as it has enough results, so lower-priority sources
//! are often never queried. Nothing here is cached or mutated between calls.

use indexmap::IndexMap;
use tracing::{debug, trace};

use hashtag_core::error::{Error, Result};
use hashtag_core::guardian::Guardian;
use hashtag_core::registry::HashtagRegistry;
use hashtag_core::traits::DataSource;
use hashtag_core::types::{HashtagItem, HashtagType, MatchCondition};

pub mod api;

pub use hashtag_core::registry::DEFAULT_COMPOSER_CONTEXT;
pub use hashtag_core::types::TYPE_SEPARATOR;

pub const LOOKUP_MAX_SLUGS: usize = 20;
pub const SEARCH_MAX_LIMIT: usize = 50;

type Sources<'a> = Vec<(HashtagType, &'a dyn DataSource)>;

pub struct HashtagAutocompleteService {
    registry: HashtagRegistry,
}

impl HashtagAutocompleteService {
    pub fn new(registry: HashtagRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HashtagRegistry {
        &self.registry
    }

    pub fn ordered_types_for_context(&self, context: &str) -> Vec<HashtagType> {
        self.registry.ordered_types_for_context(context)
    }

    pub fn contexts_with_ordered_types(&self) -> IndexMap<String, Vec<HashtagType>> {
        self.registry.contexts_with_ordered_types()
    }

    pub fn data_source_icon_map(&self) -> IndexMap<HashtagType, String> {
        self.registry.data_source_icon_map()
    }

    /// Resolve hashtags typed by a user.
    ///
    /// Plain slugs go to each type in priority order and the first type that
    /// resolves a slug claims it. A `slug::type` entry only ever resolves
    /// against that type and keeps the suffix on its ref. Only the first
    /// [`LOOKUP_MAX_SLUGS`] entries are considered; anything that does not
    /// resolve is simply missing from the result.
    pub fn lookup(
        &self,
        guardian: &Guardian,
        slugs: &[String],
        types_in_priority_order: &[HashtagType],
    ) -> Result<IndexMap<HashtagType, Vec<HashtagItem>>> {
        let sources = self.enabled_sources(types_in_priority_order);
        let mut results: IndexMap<HashtagType, Vec<HashtagItem>> =
            sources.iter().map(|(kind, _)| (kind.clone(), Vec::new())).collect();
        if sources.is_empty() {
            return Ok(results);
        }

        let mut bare: Vec<String> = Vec::new();
        let mut suffixed: Vec<(HashtagType, String)> = Vec::new();
        for slug in slugs.iter().take(LOOKUP_MAX_SLUGS).map(|s| s.trim()) {
            if slug.is_empty() {
                continue;
            }
            match split_type_suffix(slug, &sources) {
                Some((base, kind)) => {
                    if !suffixed.iter().any(|(k, b)| *k == kind && b.eq_ignore_ascii_case(base)) {
                        suffixed.push((kind, base.to_string()));
                    }
                }
                None => {
                    if !bare.iter().any(|b| b.eq_ignore_ascii_case(slug)) {
                        bare.push(slug.to_string());
                    }
                }
            }
        }

        let mut pool = bare;
        for (kind, source) in &sources {
            if pool.is_empty() {
                break;
            }
            // `x` is left to the suffixed pass when `x::kind` was also asked for.
            let candidates: Vec<String> = pool
                .iter()
                .filter(|slug| !suffixed.iter().any(|(k, base)| k == kind && base.eq_ignore_ascii_case(slug)))
                .cloned()
                .collect();
            if candidates.is_empty() {
                continue;
            }
            trace!(kind = %kind, candidates = candidates.len(), "looking up plain hashtags");
            let found: Vec<HashtagItem> = source
                .lookup(guardian, &candidates)?
                .into_iter()
                .map(|item| assign_type(item, kind))
                .collect();
            pool.retain(|slug| !(candidates.contains(slug) && found.iter().any(|item| item.answers_to(slug))));
            push_unique(results.entry(kind.clone()).or_default(), found);
        }

        for (kind, source) in &sources {
            let bases: Vec<String> = suffixed
                .iter()
                .filter(|(k, _)| k == kind)
                .map(|(_, base)| base.clone())
                .collect();
            if bases.is_empty() {
                continue;
            }
            trace!(kind = %kind, candidates = bases.len(), "looking up typed hashtags");
            let found: Vec<HashtagItem> = source
                .lookup(guardian, &bases)?
                .into_iter()
                .map(|item| assign_type(item, kind))
                .filter(|item| bases.iter().any(|base| item.answers_to(base)))
                .map(|mut item| {
                    let reference = format!("{}{}{}", item.reference(), TYPE_SEPARATOR, kind);
                    item.reference = Some(reference);
                    item
                })
                .collect();
            push_unique(results.entry(kind.clone()).or_default(), found);
        }

        for items in results.values_mut() {
            items.sort_by_cached_key(|item| item.text.to_lowercase());
        }
        debug!(
            requested = slugs.len().min(LOOKUP_MAX_SLUGS),
            resolved = results.values().map(Vec::len).sum::<usize>(),
            "hashtag lookup"
        );
        Ok(results)
    }

    /// Autocomplete suggestions for `term`, at most `limit` (itself capped at
    /// [`SEARCH_MAX_LIMIT`]).
    ///
    /// Exact slug matches come first regardless of type priority, then
    /// prefix matches, then substring matches, each pass walking the types in
    /// priority order. When several types share a slug, the highest-priority
    /// one keeps the plain ref and the others get `slug::type`, so every ref
    /// resolves back to the same item through [`Self::lookup`].
    pub fn search(
        &self,
        guardian: &Guardian,
        term: &str,
        types_in_priority_order: &[HashtagType],
        limit: usize,
    ) -> Result<Vec<HashtagItem>> {
        let limit = limit.min(SEARCH_MAX_LIMIT);
        let sources = self.enabled_sources(types_in_priority_order);
        if sources.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let order: Vec<HashtagType> = sources.iter().map(|(kind, _)| kind.clone()).collect();

        let term = term.trim();
        if term.is_empty() {
            let mut results = search_without_term(guardian, &sources, limit)?;
            append_types_to_conflicts(&mut results, &order);
            return Ok(results);
        }
        let term = term.to_lowercase();

        let mut results: Vec<HashtagItem> = Vec::new();
        for (kind, source) in &sources {
            if results.len() >= limit {
                break;
            }
            let found = source.lookup(guardian, std::slice::from_ref(&term))?;
            results.extend(found.into_iter().map(|item| assign_type(item, kind)));
        }
        debug!(term = %term, found = results.len(), "hashtag exact pass");

        let mut top_ranked_type: Option<HashtagType> = None;
        for condition in [MatchCondition::StartsWith, MatchCondition::Contains] {
            if results.len() >= limit {
                break;
            }
            for (kind, source) in &sources {
                if results.len() >= limit {
                    break;
                }
                let remaining = limit - results.len();
                let found: Vec<HashtagItem> = source
                    .search(guardian, &term, remaining, condition)?
                    .into_iter()
                    .map(|item| assign_type(item, kind))
                    .filter(|item| !results.iter().any(|r| r.is_kind(kind) && r.slug == item.slug))
                    .collect();
                let found = source.search_sort(found, &term);
                trace!(kind = %kind, ?condition, found = found.len(), "hashtag fallback search");
                if !found.is_empty() && top_ranked_type.is_none() {
                    top_ranked_type = Some(kind.clone());
                }
                results.extend(found.into_iter().take(remaining));
            }
            debug!(term = %term, ?condition, found = results.len(), "hashtag search pass");
        }

        append_types_to_conflicts(&mut results, &order);
        results.truncate(limit);
        debug!(term = %term, top_ranked = ?top_ranked_type, found = results.len(), "hashtag search");
        Ok(results)
    }

    /// Rehydrate items of one type by id. Only sources that opt in support it.
    pub fn find_by_ids(&self, guardian: &Guardian, kind: &HashtagType, ids: &[u64]) -> Result<Vec<HashtagItem>> {
        let source = self
            .registry
            .source(kind)
            .ok_or_else(|| Error::InvalidParameters(format!("hashtag type {} is not enabled", kind)))?;
        if !source.supports_find_by_ids() {
            return Err(Error::InvalidParameters(format!("hashtag type {} cannot be loaded by id", kind)));
        }
        Ok(source
            .find_by_ids(guardian, ids)?
            .into_iter()
            .map(|item| assign_type(item, kind))
            .collect())
    }

    /// Registered, enabled sources in the requested order; unknown, disabled
    /// and repeated types drop out.
    fn enabled_sources(&self, types_in_priority_order: &[HashtagType]) -> Sources<'_> {
        let mut sources: Sources<'_> = Vec::new();
        for kind in types_in_priority_order {
            if sources.iter().any(|(k, _)| k == kind) {
                continue;
            }
            if let Some(source) = self.registry.source(kind) {
                sources.push((kind.clone(), source));
            }
        }
        sources
    }
}

fn search_without_term(guardian: &Guardian, sources: &Sources<'_>, limit: usize) -> Result<Vec<HashtagItem>> {
    let per_type = limit.div_ceil(sources.len());
    let mut results = Vec::new();
    for (kind, source) in sources {
        let found = source.search_without_term(guardian, per_type)?;
        results.extend(found.into_iter().take(per_type).map(|item| assign_type(item, kind)));
    }
    results.truncate(limit);
    debug!(found = results.len(), per_type, "hashtag search without term");
    Ok(results)
}

/// `Some((slug, type))` when `slug` ends in `::type` for one of `sources`.
fn split_type_suffix<'s>(slug: &'s str, sources: &Sources<'_>) -> Option<(&'s str, HashtagType)> {
    let (base, suffix) = slug.rsplit_once(TYPE_SEPARATOR)?;
    if base.is_empty() {
        return None;
    }
    sources
        .iter()
        .find(|(kind, _)| kind.as_str() == suffix)
        .map(|(kind, _)| (base, kind.clone()))
}

fn assign_type(mut item: HashtagItem, kind: &HashtagType) -> HashtagItem {
    item.kind = Some(kind.clone());
    if item.reference.as_deref().map_or(true, str::is_empty) {
        item.reference = Some(item.slug.clone());
    }
    item
}

fn push_unique(list: &mut Vec<HashtagItem>, items: Vec<HashtagItem>) {
    for item in items {
        if !list.iter().any(|existing| existing.reference().eq_ignore_ascii_case(item.reference())) {
            list.push(item);
        }
    }
}

/// Suffix the ref of every item whose slug is also held by an item of a
/// higher-priority type. A plain slug in `lookup` resolves to the first type
/// in priority order, so only that type may keep it.
fn append_types_to_conflicts(results: &mut [HashtagItem], order: &[HashtagType]) {
    let claimed: Vec<(usize, String)> = results
        .iter()
        .filter_map(|item| {
            let rank = order.iter().position(|k| Some(k) == item.kind.as_ref())?;
            Some((rank, item.slug.to_lowercase()))
        })
        .collect();

    for item in results.iter_mut() {
        let Some(kind) = item.kind.clone() else { continue };
        let Some(rank) = order.iter().position(|k| *k == kind) else { continue };
        let slug = item.slug.to_lowercase();
        let outranked = claimed.iter().any(|(r, s)| *r < rank && *s == slug);
        let suffix = format!("{}{}", TYPE_SEPARATOR, kind);
        if outranked && !item.reference().ends_with(&suffix) {
            let reference = format!("{}{}", item.reference(), suffix);
            item.reference = Some(reference);
        }
    }
}
