//! Category mutations

use super::error::{TaxonomyError, TaxonomyResult};
use super::key::{normalize_key, normalize_label};
use super::loader::TaxonomyLoader;
use super::store::TaxonomyStore;
use crate::backend::{CatalogBackend, WriteBatch, WriteOp};
use crate::db::repository::RepoError;
use shared::models::CategoryMetadataCreate;
use std::collections::HashSet;

/// Create, rename and delete categories.
///
/// Every successful mutation returns a store reloaded from the backend.
pub struct CategoryMutator<'a, B: CatalogBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: CatalogBackend + ?Sized> CategoryMutator<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Register a new category, appended after the existing ones
    pub async fn create(
        &self,
        store: &TaxonomyStore,
        key: &str,
        label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        let entity_type = store.entity_type();
        let key = required_key(key, None)?;
        let label = required_label(label)?;

        if self.exists(store, &key).await? {
            tracing::warn!(key = %key, "Category already exists");
            return Err(TaxonomyError::duplicate(key));
        }

        let batch = WriteBatch::new().with(WriteOp::InsertCategory(CategoryMetadataCreate {
            entity_type,
            category_key: key.clone(),
            category_label: label,
            display_order: Some(display_position(store.len())),
            is_active: true,
        }));
        self.backend
            .apply(batch)
            .await
            .map_err(|e| rejected_or_failed(e, &key, "create category"))?;

        tracing::info!(key = %key, entity_type = %entity_type, "Category created");
        self.reload(store).await
    }

    /// Change a category's key and label.
    ///
    /// A key change re-keys every item of the category and re-scopes its
    /// subcategory metadata in the same batch as the metadata upsert.
    pub async fn rename(
        &self,
        store: &TaxonomyStore,
        old_key: &str,
        new_key: &str,
        new_label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        let new_key = required_key(new_key, None)?;
        self.rename_to(store, old_key, new_key, new_label).await
    }

    /// Relabel a category without touching its key
    pub async fn update_label(
        &self,
        store: &TaxonomyStore,
        key: &str,
        label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        self.rename_to(store, key, key.to_string(), label).await
    }

    /// Drop a category's metadata and every subcategory scoped to it.
    ///
    /// Catalog items keep their category key and show up as an implicit
    /// category on the next load.
    pub async fn delete(&self, store: &TaxonomyStore, key: &str) -> TaxonomyResult<TaxonomyStore> {
        let entity_type = store.entity_type();
        let meta = self
            .backend
            .find_category(entity_type, key)
            .await
            .map_err(TaxonomyError::load)?;
        let scoped_subcategories = self
            .backend
            .list_subcategories(entity_type)
            .await
            .map_err(TaxonomyError::load)?
            .into_iter()
            .filter(|s| s.category == key)
            .count();

        if meta.is_none() && scoped_subcategories == 0 {
            tracing::warn!(key = %key, "Nothing to delete for category");
            return Err(TaxonomyError::category_not_found(key));
        }

        let mut batch = WriteBatch::new().with(WriteOp::DeleteSubcategoriesOf {
            entity_type,
            category: key.to_string(),
        });
        if let Some(meta) = &meta {
            batch.push(WriteOp::DeleteCategory { id: meta.id });
        }
        let rows = self
            .backend
            .apply(batch)
            .await
            .map_err(|e| TaxonomyError::write("delete category", e))?;

        tracing::info!(
            key = %key,
            subcategories = rows.first().copied().unwrap_or(0),
            "Category deleted"
        );
        self.reload(store).await
    }

    async fn rename_to(
        &self,
        store: &TaxonomyStore,
        old_key: &str,
        new_key: String,
        new_label: &str,
    ) -> TaxonomyResult<TaxonomyStore> {
        let entity_type = store.entity_type();
        let label = required_label(new_label)?;

        let meta = self
            .backend
            .find_category(entity_type, old_key)
            .await
            .map_err(TaxonomyError::load)?;
        if meta.is_none() && !store.contains(old_key) {
            tracing::warn!(key = %old_key, "Rename of unknown category");
            return Err(TaxonomyError::category_not_found(old_key));
        }

        let key_changed = new_key != old_key;
        if key_changed && self.exists(store, &new_key).await? {
            tracing::warn!(from = %old_key, to = %new_key, "Rename target already exists");
            return Err(TaxonomyError::duplicate(new_key));
        }
        if key_changed
            && let Some(clash) = self.subcategory_clash(store, old_key, &new_key).await?
        {
            tracing::warn!(
                from = %old_key,
                to = %new_key,
                subcategory = %clash,
                "Rename would merge subcategories"
            );
            return Err(TaxonomyError::duplicate_in(new_key, clash));
        }

        let mut batch = WriteBatch::new();
        if key_changed {
            batch.push(WriteOp::RekeyItemCategory {
                entity_type,
                from: old_key.to_string(),
                to: new_key.clone(),
            });
            batch.push(WriteOp::RekeySubcategoryParent {
                entity_type,
                from: old_key.to_string(),
                to: new_key.clone(),
            });
        }
        match &meta {
            Some(meta) => batch.push(WriteOp::UpdateCategory {
                id: meta.id,
                category_key: new_key.clone(),
                category_label: label,
            }),
            None => batch.push(WriteOp::InsertCategory(CategoryMetadataCreate {
                entity_type,
                category_key: new_key.clone(),
                category_label: label,
                display_order: Some(display_position(store.len())),
                is_active: true,
            })),
        };

        let rows = self.backend.apply(batch).await.map_err(|e| {
            if key_changed {
                tracing::error!(from = %old_key, to = %new_key, error = %e, "Category rename failed");
                TaxonomyError::RenameFailed {
                    from: old_key.to_string(),
                    to: new_key.clone(),
                    source: e,
                }
            } else {
                rejected_or_failed(e, &new_key, "update category")
            }
        })?;

        if key_changed {
            tracing::info!(
                from = %old_key,
                to = %new_key,
                items = rows.first().copied().unwrap_or(0),
                subcategories = rows.get(1).copied().unwrap_or(0),
                "Category renamed"
            );
        } else {
            tracing::info!(key = %new_key, "Category label updated");
        }
        self.reload(store).await
    }

    /// Live store and persisted metadata are both authoritative for existence
    async fn exists(&self, store: &TaxonomyStore, key: &str) -> TaxonomyResult<bool> {
        if store.contains(key) {
            return Ok(true);
        }
        let meta = self
            .backend
            .find_category(store.entity_type(), key)
            .await
            .map_err(TaxonomyError::load)?;
        Ok(meta.is_some())
    }

    /// First subcategory key scoped to both `from` and `to`.
    ///
    /// Orphaned subcategory rows may already sit under `to`; re-scoping onto
    /// them would break the per-category uniqueness of subcategory keys.
    async fn subcategory_clash(
        &self,
        store: &TaxonomyStore,
        from: &str,
        to: &str,
    ) -> TaxonomyResult<Option<String>> {
        let rows = self
            .backend
            .list_subcategories(store.entity_type())
            .await
            .map_err(TaxonomyError::load)?;
        let taken: HashSet<&str> = rows
            .iter()
            .filter(|s| s.category == to)
            .map(|s| s.subcategory_key.as_str())
            .collect();
        Ok(rows
            .iter()
            .filter(|s| s.category == from)
            .find(|s| taken.contains(s.subcategory_key.as_str()))
            .map(|s| s.subcategory_key.clone()))
    }

    async fn reload(&self, store: &TaxonomyStore) -> TaxonomyResult<TaxonomyStore> {
        TaxonomyLoader::new(self.backend).load(store.entity_type()).await
    }
}

/// `parent` is the category a subcategory key is checked for
pub(super) fn required_key(raw: &str, parent: Option<&str>) -> TaxonomyResult<String> {
    normalize_key(raw).ok_or_else(|| TaxonomyError::InvalidKey {
        raw: raw.trim().to_string(),
        parent: parent.map(str::to_string),
    })
}

pub(super) fn required_label(raw: &str) -> TaxonomyResult<String> {
    normalize_label(raw).ok_or_else(|| TaxonomyError::Validation("label must not be empty".into()))
}

/// A unique-constraint hit at write time is still a duplicate key
pub(super) fn rejected_or_failed(err: RepoError, key: &str, operation: &str) -> TaxonomyError {
    match err {
        RepoError::Duplicate(_) => TaxonomyError::duplicate(key),
        other => TaxonomyError::write(operation, other),
    }
}

pub(super) fn display_position(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}
