//! In-memory taxonomy view
//!
//! A [`TaxonomyStore`] is a value: loaders build one, mutators take the
//! current one and hand back a freshly loaded replacement. Nothing in this
//! crate keeps a store alive between calls.

use serde::{Deserialize, Serialize};
use shared::models::EntityType;
use std::collections::BTreeMap;

/// A subcategory as displayed under its parent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryEntry {
    pub key: String,
    pub label: String,
    pub metadata_id: i64,
    pub display_order: Option<i32>,
    /// Live count of items classified under `(category, key)`
    pub item_count: usize,
}

/// A category with its live item count and ordered subcategories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub key: String,
    /// Metadata label, or the raw key when the category is implicit
    pub label: String,
    pub metadata_id: Option<i64>,
    pub item_count: usize,
    /// Display order ascending, NULL as 0
    pub subcategories: Vec<SubcategoryEntry>,
}

impl CategoryEntry {
    /// Observed in catalog items but without a metadata row
    pub fn is_implicit(&self) -> bool {
        self.metadata_id.is_none()
    }

    pub fn subcategory(&self, key: &str) -> Option<&SubcategoryEntry> {
        self.subcategories.iter().find(|s| s.key == key)
    }
}

/// Categories of one catalog, keyed by normalized key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonomyStore {
    entity_type: EntityType,
    categories: BTreeMap<String, CategoryEntry>,
}

impl TaxonomyStore {
    pub fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            categories: BTreeMap::new(),
        }
    }

    pub fn from_entries(
        entity_type: EntityType,
        entries: impl IntoIterator<Item = CategoryEntry>,
    ) -> Self {
        Self {
            entity_type,
            categories: entries.into_iter().map(|e| (e.key.clone(), e)).collect(),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&CategoryEntry> {
        self.categories.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.categories.contains_key(key)
    }

    /// Entries in key order
    pub fn iter(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.categories.values()
    }

    /// Entries ordered for display: label (case-insensitive), then key
    pub fn sorted_by_label(&self) -> Vec<&CategoryEntry> {
        let mut entries: Vec<_> = self.categories.values().collect();
        entries.sort_by(|a, b| {
            a.label
                .to_lowercase()
                .cmp(&b.label.to_lowercase())
                .then_with(|| a.key.cmp(&b.key))
        });
        entries
    }

    /// Only the categories referenced by at least one catalog item.
    ///
    /// Metadata-only categories are part of the store (so a freshly created
    /// category shows up) but are not part of the catalog itself.
    pub fn catalog_categories(&self) -> impl Iterator<Item = &CategoryEntry> {
        self.categories.values().filter(|e| e.item_count > 0)
    }

    pub fn total_items(&self) -> usize {
        self.categories.values().map(|e| e.item_count).sum()
    }
}
