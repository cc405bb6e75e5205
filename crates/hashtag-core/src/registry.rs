//! Data source and type priority registry.
//!
//! Built once at startup: the two default sources are required by the
//! builder, plugins add further types before `build()`, and the result is
//! handed to the engine by value. Nothing is mutated after that.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::traits::DataSource;
use crate::types::{HashtagType, TypePriority, TYPE_SEPARATOR};

pub const DEFAULT_COMPOSER_CONTEXT: &str = "topic-composer";

pub struct RegistryBuilder {
    sources: IndexMap<HashtagType, Box<dyn DataSource>>,
    priorities: Vec<TypePriority>,
}

impl RegistryBuilder {
    pub fn new<C, T>(category: C, tag: T) -> Self
    where
        C: DataSource + 'static,
        T: DataSource + 'static,
    {
        let mut sources: IndexMap<HashtagType, Box<dyn DataSource>> = IndexMap::new();
        sources.insert(HashtagType::Category, Box::new(category));
        sources.insert(HashtagType::Tag, Box::new(tag));
        Self { sources, priorities: Vec::new() }
            .register_type_priority(HashtagType::Category, DEFAULT_COMPOSER_CONTEXT, 100)
            .register_type_priority(HashtagType::Tag, DEFAULT_COMPOSER_CONTEXT, 50)
    }

    pub fn register_data_source<S>(mut self, kind: impl Into<HashtagType>, source: S) -> Result<Self>
    where
        S: DataSource + 'static,
    {
        let kind = kind.into();
        if kind.as_str().is_empty() || kind.as_str().contains(TYPE_SEPARATOR) {
            return Err(Error::InvalidConfig(format!("invalid hashtag type name {:?}", kind.as_str())));
        }
        if self.sources.contains_key(&kind) {
            return Err(Error::InvalidConfig(format!("hashtag type {} is already registered", kind)));
        }
        self.sources.insert(kind, Box::new(source));
        Ok(self)
    }

    /// A later registration for the same `(kind, context)` replaces the earlier one.
    pub fn register_type_priority(
        mut self,
        kind: impl Into<HashtagType>,
        context: impl Into<String>,
        priority: i32,
    ) -> Self {
        let kind = kind.into();
        let context = context.into();
        match self.priorities.iter_mut().find(|p| p.kind == kind && p.context == context) {
            Some(existing) => existing.priority = priority,
            None => self.priorities.push(TypePriority { kind, context, priority }),
        }
        self
    }

    pub fn build(self) -> HashtagRegistry {
        tracing::debug!(
            types = ?self.sources.keys().map(HashtagType::as_str).collect::<Vec<_>>(),
            priorities = self.priorities.len(),
            "built hashtag registry"
        );
        HashtagRegistry { sources: self.sources, priorities: self.priorities }
    }
}

pub struct HashtagRegistry {
    sources: IndexMap<HashtagType, Box<dyn DataSource>>,
    priorities: Vec<TypePriority>,
}

impl HashtagRegistry {
    /// The source for `kind`, or `None` if it is unknown or disabled.
    pub fn source(&self, kind: &HashtagType) -> Option<&dyn DataSource> {
        self.sources.get(kind).filter(|s| s.enabled()).map(|s| &**s)
    }

    pub fn is_enabled(&self, kind: &HashtagType) -> bool {
        self.source(kind).is_some()
    }

    pub fn enabled_types(&self) -> Vec<HashtagType> {
        self.sources
            .iter()
            .filter(|(_, s)| s.enabled())
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn contexts(&self) -> Vec<String> {
        let mut contexts: Vec<String> = Vec::new();
        for p in &self.priorities {
            if !contexts.contains(&p.context) {
                contexts.push(p.context.clone());
            }
        }
        contexts
    }

    /// Enabled types for `context`, highest priority first. Equal priorities
    /// keep source registration order. A context nobody registered falls
    /// back to every enabled type in registration order.
    pub fn ordered_types_for_context(&self, context: &str) -> Vec<HashtagType> {
        let mut ranked: Vec<(usize, &TypePriority)> = self
            .priorities
            .iter()
            .filter(|p| p.context == context)
            .filter_map(|p| self.sources.get_index_of(&p.kind).map(|idx| (idx, p)))
            .filter(|(_, p)| self.is_enabled(&p.kind))
            .collect();
        if ranked.is_empty() && !self.priorities.iter().any(|p| p.context == context) {
            return self.enabled_types();
        }
        ranked.sort_by(|(ia, a), (ib, b)| b.priority.cmp(&a.priority).then(ia.cmp(ib)));
        ranked.into_iter().map(|(_, p)| p.kind.clone()).collect()
    }

    pub fn contexts_with_ordered_types(&self) -> IndexMap<String, Vec<HashtagType>> {
        self.contexts()
            .into_iter()
            .map(|ctx| {
                let types = self.ordered_types_for_context(&ctx);
                (ctx, types)
            })
            .collect()
    }

    pub fn data_source_icon_map(&self) -> IndexMap<HashtagType, String> {
        self.sources
            .iter()
            .filter(|(_, s)| s.enabled())
            .map(|(k, s)| (k.clone(), s.icon().to_string()))
            .collect()
    }
}
