//! Read-only listing

use super::ProductScope;
use crate::backend::CatalogBackend;
use crate::taxonomy::{TaxonomyError, TaxonomyResult};
use shared::models::{CatalogItem, EntityType};
use std::cmp::Ordering;

pub struct ProductBrowser<'a, B: CatalogBackend + ?Sized> {
    backend: &'a B,
    entity_type: EntityType,
}

impl<'a, B: CatalogBackend + ?Sized> ProductBrowser<'a, B> {
    pub fn new(backend: &'a B, entity_type: EntityType) -> Self {
        Self {
            backend,
            entity_type,
        }
    }

    /// Items of the scope, sort key ascending with unranked items last, then name
    pub async fn list(&self, scope: &ProductScope) -> TaxonomyResult<Vec<CatalogItem>> {
        let items = self
            .backend
            .list_items(self.entity_type, scope)
            .await
            .map_err(TaxonomyError::load)?;
        tracing::debug!(
            category = %scope.category,
            subcategory = ?scope.subcategory,
            count = items.len(),
            "Listed products"
        );
        Ok(items)
    }
}

/// Display order of items within a scope
pub fn compare_for_display(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    let rank = match (a.sort_order, b.sort_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    rank.then_with(|| a.name.cmp(&b.name))
}
