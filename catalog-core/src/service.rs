//! Taxonomy service facade
//!
//! One entry point per caller-facing operation. Mutations take the store the
//! caller is currently showing and return the reloaded one.

use crate::backend::CatalogBackend;
use crate::products::{Direction, ProductBrowser, ProductOrderer, ProductScope};
use crate::taxonomy::{
    CategoryMutator, SubcategoryMutator, TaxonomyLoader, TaxonomyResult, TaxonomyStore,
};
use shared::models::{CatalogItem, EntityType};
use std::sync::Arc;

/// Backend plus the catalog it manages
pub struct TaxonomyService<B: CatalogBackend + ?Sized> {
    backend: Arc<B>,
    entity_type: EntityType,
}

impl<B: CatalogBackend + ?Sized> Clone for TaxonomyService<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            entity_type: self.entity_type,
        }
    }
}

impl<B: CatalogBackend + ?Sized> TaxonomyService<B> {
    pub fn new(backend: Arc<B>, entity_type: EntityType) -> Self {
        Self {
            backend,
            entity_type,
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ========== Taxonomy ==========

    pub async fn load_taxonomy(&self) -> TaxonomyResult<TaxonomyStore> {
        TaxonomyLoader::new(self.backend.as_ref())
            .load(self.entity_type)
            .await
    }

    pub async fn create_category(
        &self,
        store: &TaxonomyStore,
        key: &str,
        label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.categories().create(store, key, label).await
    }

    pub async fn rename_category(
        &self,
        store: &TaxonomyStore,
        old_key: &str,
        new_key: &str,
        new_label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.categories()
            .rename(store, old_key, new_key, new_label)
            .await
    }

    pub async fn update_category_label(
        &self,
        store: &TaxonomyStore,
        key: &str,
        label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.categories().update_label(store, key, label).await
    }

    pub async fn delete_category(
        &self,
        store: &TaxonomyStore,
        key: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.categories().delete(store, key).await
    }

    pub async fn create_subcategory(
        &self,
        store: &TaxonomyStore,
        category: Option<&str>,
        key: &str,
        label: &str,
        order: Option<i32>,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.subcategories()
            .create(store, category, key, label, order)
            .await
    }

    pub async fn rename_subcategory(
        &self,
        store: &TaxonomyStore,
        category: &str,
        old_key: &str,
        new_key: &str,
        new_label: &str,
        order: Option<i32>,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.subcategories()
            .rename(store, category, old_key, new_key, new_label, order)
            .await
    }

    pub async fn delete_subcategory(
        &self,
        store: &TaxonomyStore,
        category: &str,
        key: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.subcategories().delete(store, category, key).await
    }

    // ========== Products ==========

    pub async fn list_products(&self, scope: &ProductScope) -> TaxonomyResult<Vec<CatalogItem>> {
        ProductBrowser::new(self.backend.as_ref(), self.entity_type)
            .list(scope)
            .await
    }

    /// Move one position within the scope and return the refreshed listing
    pub async fn move_product(
        &self,
        scope: &ProductScope,
        index: usize,
        direction: Direction,
    ) -> TaxonomyResult<Vec<CatalogItem>> {
        let items = self.list_products(scope).await?;
        ProductOrderer::new(self.backend.as_ref())
            .move_adjacent(&items, index, direction)
            .await?;
        self.list_products(scope).await
    }

    pub async fn set_product_order(
        &self,
        scope: &ProductScope,
        item_id: i64,
        value: i32,
    ) -> TaxonomyResult<Vec<CatalogItem>> {
        ProductOrderer::new(self.backend.as_ref())
            .set_order(item_id, value)
            .await?;
        self.list_products(scope).await
    }

    fn categories(&self) -> CategoryMutator<'_, B> {
        CategoryMutator::new(self.backend.as_ref())
    }

    fn subcategories(&self) -> SubcategoryMutator<'_, B> {
        SubcategoryMutator::new(self.backend.as_ref())
    }
}
