//! Subcategory mutations, scoped to one parent category

use super::category::{display_position, required_key, required_label};
use super::error::{TaxonomyError, TaxonomyResult};
use super::loader::TaxonomyLoader;
use super::store::TaxonomyStore;
use crate::backend::{CatalogBackend, WriteBatch, WriteOp};
use crate::db::repository::RepoError;
use shared::models::SubcategoryMetadataCreate;

pub struct SubcategoryMutator<'a, B: CatalogBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: CatalogBackend + ?Sized> SubcategoryMutator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Register a subcategory under `category`.
    ///
    /// `order` defaults to the position after the parent's last subcategory.
    pub async fn create(
        &self,
        store: &TaxonomyStore,
        category: Option<&str>,
        key: &str,
        label: &str,
        order: Option<i32>,
    ) -> TaxonomyResult<TaxonomyStore> {
        let entity_type = store.entity_type();
        let category = selected_category(category)?;
        let key = required_key(key, Some(category))?;
        let label = required_label(label)?;

        let parent = store.get(category);
        if parent.is_none()
            && self
                .backend
                .find_category(entity_type, category)
                .await
                .map_err(TaxonomyError::load)?
                .is_none()
        {
            tracing::warn!(category = %category, "Parent category not found");
            return Err(TaxonomyError::category_not_found(category));
        }

        let live = parent.and_then(|p| p.subcategory(&key)).is_some();
        if live
            || self
                .backend
                .find_subcategory(entity_type, category, &key)
                .await
                .map_err(TaxonomyError::load)?
                .is_some()
        {
            tracing::warn!(category = %category, key = %key, "Subcategory already exists");
            return Err(TaxonomyError::duplicate_in(category, key));
        }

        let siblings = parent.map(|p| p.subcategories.len()).unwrap_or(0);
        let batch = WriteBatch::new().with(WriteOp::InsertSubcategory(SubcategoryMetadataCreate {
            entity_type,
            category: category.to_string(),
            subcategory_key: key.clone(),
            subcategory_label: label,
            display_order: Some(order.unwrap_or_else(|| display_position(siblings))),
            is_active: true,
        }));
        self.backend
            .apply(batch)
            .await
            .map_err(|e| match e {
                RepoError::Duplicate(_) => TaxonomyError::duplicate_in(category, key.clone()),
                other => TaxonomyError::write("create subcategory", other),
            })?;

        tracing::info!(category = %category, key = %key, "Subcategory created");
        self.reload(store).await
    }

    /// Change a subcategory's key, label and display order.
    ///
    /// A key change re-keys the matching catalog items in the same batch as
    /// the metadata update. `order: None` keeps the current display order.
    pub async fn rename(
        &self,
        store: &TaxonomyStore,
        category: &str,
        old_key: &str,
        new_key: &str,
        new_label: &str,
        order: Option<i32>,
    ) -> TaxonomyResult<TaxonomyStore> {
        let entity_type = store.entity_type();
        let new_key = required_key(new_key, Some(category))?;
        let label = required_label(new_label)?;

        let meta = self
            .backend
            .find_subcategory(entity_type, category, old_key)
            .await
            .map_err(TaxonomyError::load)?
            .ok_or_else(|| TaxonomyError::subcategory_not_found(category, old_key))?;

        let key_changed = new_key != old_key;
        if key_changed
            && self
                .backend
                .find_subcategory(entity_type, category, &new_key)
                .await
                .map_err(TaxonomyError::load)?
                .is_some()
        {
            tracing::warn!(category = %category, to = %new_key, "Rename target already exists");
            return Err(TaxonomyError::duplicate_in(category, new_key));
        }

        let mut batch = WriteBatch::new();
        if key_changed {
            batch.push(WriteOp::RekeyItemSubcategory {
                entity_type,
                category: category.to_string(),
                from: old_key.to_string(),
                to: new_key.clone(),
            });
        }
        batch.push(WriteOp::UpdateSubcategory {
            id: meta.id,
            subcategory_key: new_key.clone(),
            subcategory_label: label,
            display_order: order.or(meta.display_order),
        });

        let rows = self.backend.apply(batch).await.map_err(|e| {
            if key_changed {
                tracing::error!(
                    category = %category,
                    from = %old_key,
                    to = %new_key,
                    error = %e,
                    "Subcategory rename failed"
                );
                TaxonomyError::RenameFailed {
                    from: format!("{category}:{old_key}"),
                    to: format!("{category}:{new_key}"),
                    source: e,
                }
            } else {
                match e {
                    RepoError::Duplicate(_) => TaxonomyError::duplicate_in(category, new_key.clone()),
                    other => TaxonomyError::write("update subcategory", other),
                }
            }
        })?;

        tracing::info!(
            category = %category,
            from = %old_key,
            to = %new_key,
            items = if key_changed { rows.first().copied().unwrap_or(0) } else { 0 },
            "Subcategory updated"
        );
        self.reload(store).await
    }

    /// Remove the metadata row only; items keep their subcategory key
    pub async fn delete(
        &self,
        store: &TaxonomyStore,
        category: &str,
        key: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        let meta = self
            .backend
            .find_subcategory(store.entity_type(), category, key)
            .await
            .map_err(TaxonomyError::load)?
            .ok_or_else(|| TaxonomyError::subcategory_not_found(category, key))?;

        self.backend
            .apply(WriteBatch::new().with(WriteOp::DeleteSubcategory { id: meta.id }))
            .await
            .map_err(|e| TaxonomyError::write("delete subcategory", e))?;

        tracing::info!(category = %category, key = %key, "Subcategory deleted");
        self.reload(store).await
    }

    async fn reload(&self, store: &TaxonomyStore) -> TaxonomyResult<TaxonomyStore> {
        TaxonomyLoader::new(self.backend).load(store.entity_type()).await
    }
}

fn selected_category(category: Option<&str>) -> TaxonomyResult<&str> {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => Ok(c),
        _ => Err(TaxonomyError::CategoryNotSelected),
    }
}
