#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hashtag_core::guardian::Guardian;
use hashtag_core::registry::RegistryBuilder;
use hashtag_core::traits::DataSource;
use hashtag_core::types::{HashtagItem, MatchCondition};
use hashtag_engine::HashtagAutocompleteService;

/// An in-memory source over `(slug, text)` pairs that counts its calls.
pub struct FakeSource {
    icon: &'static str,
    entries: Vec<(String, String)>,
    enabled: bool,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new(icon: &'static str, slugs: &[&str]) -> Self {
        let entries = slugs.iter().map(|s| (s.to_string(), capitalize(s))).collect();
        Self { icon, entries, enabled: true, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn with_texts(icon: &'static str, entries: &[(&str, &str)]) -> Self {
        let entries = entries.iter().map(|(s, t)| (s.to_string(), t.to_string())).collect();
        Self { icon, entries, enabled: true, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    fn item(&self, index: usize) -> HashtagItem {
        let (slug, text) = &self.entries[index];
        let mut item = HashtagItem::new(text.clone(), slug.clone(), index as u64 + 1);
        item.icon = self.icon.to_string();
        item.relative_url = format!("/{}/{}", self.icon, slug);
        item
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl DataSource for FakeSource {
    fn icon(&self) -> &str {
        self.icon
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn lookup(&self, _guardian: &Guardian, slugs: &[String]) -> anyhow::Result<Vec<HashtagItem>> {
        self.hit();
        Ok((0..self.entries.len())
            .filter(|&i| slugs.iter().any(|s| s.eq_ignore_ascii_case(&self.entries[i].0)))
            .map(|i| self.item(i))
            .collect())
    }

    fn search(
        &self,
        _guardian: &Guardian,
        term: &str,
        limit: usize,
        condition: MatchCondition,
    ) -> anyhow::Result<Vec<HashtagItem>> {
        self.hit();
        Ok((0..self.entries.len())
            .filter(|&i| condition.matches(&self.entries[i].0, term))
            .take(limit)
            .map(|i| self.item(i))
            .collect())
    }

    fn search_without_term(&self, _guardian: &Guardian, limit: usize) -> anyhow::Result<Vec<HashtagItem>> {
        self.hit();
        Ok((0..self.entries.len()).take(limit).map(|i| self.item(i)).collect())
    }

    fn search_sort(&self, mut items: Vec<HashtagItem>, _term: &str) -> Vec<HashtagItem> {
        items.sort_by(|a, b| a.slug.cmp(&b.slug));
        items
    }
}

/// A source whose storage is always down.
pub struct FailingSource;

impl DataSource for FailingSource {
    fn icon(&self) -> &str {
        "bolt"
    }

    fn lookup(&self, _guardian: &Guardian, _slugs: &[String]) -> anyhow::Result<Vec<HashtagItem>> {
        anyhow::bail!("storage unavailable")
    }

    fn search(
        &self,
        _guardian: &Guardian,
        _term: &str,
        _limit: usize,
        _condition: MatchCondition,
    ) -> anyhow::Result<Vec<HashtagItem>> {
        anyhow::bail!("storage unavailable")
    }

    fn search_without_term(&self, _guardian: &Guardian, _limit: usize) -> anyhow::Result<Vec<HashtagItem>> {
        anyhow::bail!("storage unavailable")
    }

    fn search_sort(&self, items: Vec<HashtagItem>, _term: &str) -> Vec<HashtagItem> {
        items
    }
}

pub fn service(categories: FakeSource, tags: FakeSource) -> HashtagAutocompleteService {
    HashtagAutocompleteService::new(RegistryBuilder::new(categories, tags).build())
}

pub fn refs(items: &[HashtagItem]) -> Vec<&str> {
    items.iter().map(|i| i.reference()).collect()
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
