//! Category Metadata Model

use super::EntityType;
use serde::{Deserialize, Serialize};

/// Human-facing metadata of a category key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryMetadata {
    pub id: i64,
    pub entity_type: EntityType,
    /// Unique per entity type
    pub category_key: String,
    pub category_label: String,
    pub display_order: Option<i32>,
    pub is_active: bool,
}

/// Create category metadata payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMetadataCreate {
    pub entity_type: EntityType,
    pub category_key: String,
    pub category_label: String,
    pub display_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
