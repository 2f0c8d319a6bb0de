//! Data models
//!
//! Records of the three taxonomy collections plus their create payloads.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes.

pub mod catalog_item;
pub mod category_metadata;
pub mod entity_type;
pub mod subcategory_metadata;

// Re-exports
pub use catalog_item::*;
pub use category_metadata::*;
pub use entity_type::*;
pub use subcategory_metadata::*;
