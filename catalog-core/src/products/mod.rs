//! Product ranking within the taxonomy
//!
//! [`ProductBrowser`] lists the items of a scope in display order;
//! [`ProductOrderer`] rewrites their sort keys.

mod browser;
mod orderer;

pub use browser::{ProductBrowser, compare_for_display};
pub use orderer::{Direction, MoveOutcome, ProductOrderer};

use serde::{Deserialize, Serialize};
use shared::models::CatalogItem;

/// A category, optionally narrowed to one of its subcategories
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductScope {
    pub category: String,
    pub subcategory: Option<String>,
}

impl ProductScope {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: None,
        }
    }

    pub fn subcategory(category: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            subcategory: Some(subcategory.into()),
        }
    }

    pub fn contains(&self, item: &CatalogItem) -> bool {
        item.category == self.category
            && match &self.subcategory {
                Some(sub) => item.subcategory.as_deref() == Some(sub.as_str()),
                None => true,
            }
    }
}
