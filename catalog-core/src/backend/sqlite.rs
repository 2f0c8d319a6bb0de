//! SQLite backend

use super::{CatalogBackend, WriteBatch, WriteOp};
use crate::db::repository::{
    RepoResult, catalog_item, category_metadata, subcategory_metadata,
};
use crate::products::ProductScope;
use async_trait::async_trait;
use shared::models::{
    CatalogItem, CatalogItemCreate, CategoryMetadata, EntityType, ItemKeys, SubcategoryMetadata,
};
use sqlx::SqlitePool;

/// [`CatalogBackend`] over a SQLite pool; batches run in one transaction
#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl CatalogBackend for SqliteBackend {
    async fn item_keys(&self, entity_type: EntityType) -> RepoResult<Vec<ItemKeys>> {
        catalog_item::find_keys(&self.pool, entity_type).await
    }

    async fn list_items(
        &self,
        entity_type: EntityType,
        scope: &ProductScope,
    ) -> RepoResult<Vec<CatalogItem>> {
        catalog_item::find_in_scope(
            &self.pool,
            entity_type,
            &scope.category,
            scope.subcategory.as_deref(),
        )
        .await
    }

    async fn insert_item(&self, data: CatalogItemCreate) -> RepoResult<CatalogItem> {
        catalog_item::create(&self.pool, data).await
    }

    async fn list_categories(&self, entity_type: EntityType) -> RepoResult<Vec<CategoryMetadata>> {
        category_metadata::find_all(&self.pool, entity_type).await
    }

    async fn find_category(
        &self,
        entity_type: EntityType,
        key: &str,
    ) -> RepoResult<Option<CategoryMetadata>> {
        category_metadata::find_by_key(&self.pool, entity_type, key).await
    }

    async fn list_subcategories(
        &self,
        entity_type: EntityType,
    ) -> RepoResult<Vec<SubcategoryMetadata>> {
        subcategory_metadata::find_all(&self.pool, entity_type).await
    }

    async fn find_subcategory(
        &self,
        entity_type: EntityType,
        category: &str,
        key: &str,
    ) -> RepoResult<Option<SubcategoryMetadata>> {
        subcategory_metadata::find_by_key(&self.pool, entity_type, category, key).await
    }

    async fn apply(&self, batch: WriteBatch) -> RepoResult<Vec<u64>> {
        let mut tx = self.pool.begin().await?;
        let mut affected = Vec::with_capacity(batch.len());

        // Any early return drops `tx`, which rolls the whole batch back.
        for op in batch.iter() {
            let rows = match op {
                WriteOp::InsertCategory(data) => {
                    category_metadata::create(&mut *tx, data).await?;
                    1
                }
                WriteOp::UpdateCategory {
                    id,
                    category_key,
                    category_label,
                } => category_metadata::update(&mut *tx, *id, category_key, category_label).await?,
                WriteOp::DeleteCategory { id } => category_metadata::delete(&mut *tx, *id).await?,
                WriteOp::InsertSubcategory(data) => {
                    subcategory_metadata::create(&mut *tx, data).await?;
                    1
                }
                WriteOp::UpdateSubcategory {
                    id,
                    subcategory_key,
                    subcategory_label,
                    display_order,
                } => {
                    subcategory_metadata::update(
                        &mut *tx,
                        *id,
                        subcategory_key,
                        subcategory_label,
                        *display_order,
                    )
                    .await?
                }
                WriteOp::DeleteSubcategory { id } => {
                    subcategory_metadata::delete(&mut *tx, *id).await?
                }
                WriteOp::DeleteSubcategoriesOf {
                    entity_type,
                    category,
                } => subcategory_metadata::delete_by_category(&mut *tx, *entity_type, category).await?,
                WriteOp::RekeySubcategoryParent {
                    entity_type,
                    from,
                    to,
                } => subcategory_metadata::rekey_category(&mut *tx, *entity_type, from, to).await?,
                WriteOp::RekeyItemCategory {
                    entity_type,
                    from,
                    to,
                } => catalog_item::rekey_category(&mut *tx, *entity_type, from, to).await?,
                WriteOp::RekeyItemSubcategory {
                    entity_type,
                    category,
                    from,
                    to,
                } => {
                    catalog_item::rekey_subcategory(&mut *tx, *entity_type, category, from, to)
                        .await?
                }
                WriteOp::SetItemSortOrder { id, sort_order } => {
                    catalog_item::set_sort_order(&mut *tx, *id, *sort_order).await?
                }
            };
            tracing::debug!(op = %op, rows, "Applied write");
            affected.push(rows);
        }

        tx.commit().await?;
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::repository::RepoError;
    use shared::models::CategoryMetadataCreate;

    async fn backend() -> SqliteBackend {
        let db = DbService::in_memory().await.unwrap();
        SqliteBackend::new(db.pool)
    }

    fn category(key: &str) -> CategoryMetadataCreate {
        CategoryMetadataCreate {
            entity_type: EntityType::Equipment,
            category_key: key.to_string(),
            category_label: key.to_uppercase(),
            display_order: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn failing_op_rolls_back_whole_batch() {
        let backend = backend().await;
        backend
            .apply(WriteBatch::new().with(WriteOp::InsertCategory(category("polishing"))))
            .await
            .unwrap();

        // Second insert of the same key trips the UNIQUE constraint.
        let batch = WriteBatch::new()
            .with(WriteOp::InsertCategory(category("mounting")))
            .with(WriteOp::InsertCategory(category("polishing")));
        let err = backend.apply(batch).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)), "got {err:?}");

        let keys: Vec<_> = backend
            .list_categories(EntityType::Equipment)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.category_key)
            .collect();
        assert_eq!(keys, vec!["polishing".to_string()]);
    }

    #[tokio::test]
    async fn items_list_nulls_last_then_name() {
        let backend = backend().await;
        for (name, order) in [("Zeta", None), ("Alpha", None), ("Mid", Some(5))] {
            let mut data = CatalogItemCreate::new(EntityType::Equipment, "cutting", None, name);
            data.sort_order = order;
            backend.insert_item(data).await.unwrap();
        }

        let names: Vec<_> = backend
            .list_items(EntityType::Equipment, &ProductScope::category("cutting"))
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Mid", "Alpha", "Zeta"]);
    }
}
