//! Permission context handed to every data source call.

use crate::catalog::{Catalog, Category, Tag};

#[derive(Debug, Clone, Default)]
pub struct Guardian {
    pub user_id: Option<u64>,
    pub staff: bool,
    pub group_ids: Vec<u64>,
    pub muted_tag_ids: Vec<u64>,
}

impl Guardian {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn staff(user_id: u64) -> Self {
        Self { user_id: Some(user_id), staff: true, ..Self::default() }
    }

    pub fn for_user(user_id: u64, group_ids: Vec<u64>) -> Self {
        Self { user_id: Some(user_id), group_ids, ..Self::default() }
    }

    pub fn with_muted_tags(mut self, muted_tag_ids: Vec<u64>) -> Self {
        self.muted_tag_ids = muted_tag_ids;
        self
    }

    /// Checks the category and its parent. Only one level is walked since
    /// `Catalog::load` rejects deeper nesting.
    pub fn can_see_category(&self, catalog: &Catalog, category: &Category) -> bool {
        if self.staff {
            return true;
        }
        let allowed = |c: &Category| {
            !c.read_restricted || c.allowed_group_ids.iter().any(|g| self.group_ids.contains(g))
        };
        allowed(category) && catalog.parent_of(category).map_or(true, allowed)
    }

    pub fn can_see_tag(&self, tag: &Tag) -> bool {
        self.staff || !tag.staff_only
    }

    pub fn has_muted_tag(&self, tag_id: u64) -> bool {
        self.muted_tag_ids.contains(&tag_id)
    }
}
