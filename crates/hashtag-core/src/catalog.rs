//! In-memory category and tag store backing the built-in data sources.
//!
//! A catalog is read once from a TOML file with `[[categories]]` and
//! `[[tags]]` tables and shared read-only between sources.

use figment::{
    providers::{Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub parent_category_id: Option<u64>,
    #[serde(default)]
    pub read_restricted: bool,
    #[serde(default)]
    pub allowed_group_ids: Vec<u64>,
    #[serde(default)]
    pub topic_count: u64,
}

fn default_color() -> String {
    "0088CC".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub topic_count: u64,
    #[serde(default)]
    pub staff_only: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        Self { categories, tags }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("catalog file {}", path.display())));
        }
        let catalog: Catalog = Figment::new()
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        catalog.validate()?;
        tracing::debug!(
            categories = catalog.categories.len(),
            tags = catalog.tags.len(),
            "loaded catalog from {}",
            path.display()
        );
        Ok(catalog)
    }

    /// Every `parent_category_id` must name an existing top-level category.
    pub fn validate(&self) -> Result<()> {
        for category in &self.categories {
            let Some(parent_id) = category.parent_category_id else { continue };
            match self.category(parent_id) {
                None => {
                    return Err(Error::InvalidConfig(format!(
                        "category {} has unknown parent {}",
                        category.id, parent_id
                    )))
                }
                Some(parent) if parent.parent_category_id.is_some() => {
                    return Err(Error::InvalidConfig(format!(
                        "category {} has parent {} which is itself a subcategory",
                        category.id, parent_id
                    )))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn parent_of(&self, category: &Category) -> Option<&Category> {
        category.parent_category_id.and_then(|id| self.category(id))
    }

    /// `parent/child` for subcategories, the bare slug otherwise.
    pub fn slug_path(&self, category: &Category) -> String {
        match self.parent_of(category) {
            Some(parent) => format!("{}/{}", parent.slug, category.slug),
            None => category.slug.clone(),
        }
    }

    /// The hashtag form of a category: `parent:child` or `slug`.
    pub fn slug_ref(&self, category: &Category) -> String {
        match self.parent_of(category) {
            Some(parent) => format!("{}:{}", parent.slug, category.slug),
            None => category.slug.clone(),
        }
    }

    pub fn category_by_slug_path(&self, parent_slug: &str, child_slug: &str) -> Option<&Category> {
        let parent = self
            .categories
            .iter()
            .find(|c| c.parent_category_id.is_none() && c.slug.eq_ignore_ascii_case(parent_slug))?;
        self.categories
            .iter()
            .find(|c| c.parent_category_id == Some(parent.id) && c.slug.eq_ignore_ascii_case(child_slug))
    }

    pub fn tag(&self, id: u64) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }
}
