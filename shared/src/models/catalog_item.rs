//! Catalog Item Model

use super::{EntityType, ItemStatus};
use serde::{Deserialize, Serialize};

/// Catalog item entity
///
/// Owned by the catalog-editing collaborator. The taxonomy core only rewrites
/// `category` / `subcategory` during renames and `sort_order` when ranking.
/// Neither key is foreign-key enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CatalogItem {
    pub id: i64,
    pub entity_type: EntityType,
    pub category: String,
    pub subcategory: Option<String>,
    pub name: String,
    pub status: ItemStatus,
    /// Manual display rank within its scope; not unique
    pub sort_order: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Create catalog item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItemCreate {
    pub entity_type: EntityType,
    pub category: String,
    pub subcategory: Option<String>,
    pub name: String,
    #[serde(default)]
    pub status: ItemStatus,
    pub sort_order: Option<i32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl CatalogItemCreate {
    /// Minimal payload: draft item with no rank, description or image
    pub fn new(
        entity_type: EntityType,
        category: impl Into<String>,
        subcategory: Option<&str>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            entity_type,
            category: category.into(),
            subcategory: subcategory.map(str::to_string),
            name: name.into(),
            status: ItemStatus::default(),
            sort_order: None,
            description: None,
            image_url: None,
        }
    }
}

/// The classification pair of an item, used to compute live counts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemKeys {
    pub category: String,
    pub subcategory: Option<String>,
}
