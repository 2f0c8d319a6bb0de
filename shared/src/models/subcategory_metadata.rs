//! Subcategory Metadata Model

use super::EntityType;
use serde::{Deserialize, Serialize};

/// Human-facing metadata of a subcategory key, scoped to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct SubcategoryMetadata {
    pub id: i64,
    pub entity_type: EntityType,
    /// Parent category key
    pub category: String,
    /// Unique per (entity type, category)
    pub subcategory_key: String,
    pub subcategory_label: String,
    pub display_order: Option<i32>,
    pub is_active: bool,
}

/// Create subcategory metadata payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryMetadataCreate {
    pub entity_type: EntityType,
    pub category: String,
    pub subcategory_key: String,
    pub subcategory_label: String,
    pub display_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
