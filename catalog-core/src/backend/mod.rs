//! Storage collaborator
//!
//! The taxonomy core talks to its three collections (catalog items, category
//! metadata, subcategory metadata) only through [`CatalogBackend`]. Reads are
//! individual calls; every write is expressed as a [`WriteOp`] and submitted
//! in a [`WriteBatch`], which a backend must apply as one unit of work.

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use crate::db::repository::RepoResult;
use crate::products::ProductScope;
use async_trait::async_trait;
use shared::models::{
    CatalogItem, CatalogItemCreate, CategoryMetadata, CategoryMetadataCreate, EntityType,
    ItemKeys, SubcategoryMetadata, SubcategoryMetadataCreate,
};
use std::fmt;

/// Collection interface the taxonomy core is written against
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// `(category, subcategory)` of every item of the catalog
    async fn item_keys(&self, entity_type: EntityType) -> RepoResult<Vec<ItemKeys>>;

    /// Items in scope, sort_order ascending with NULLs last, then name
    async fn list_items(
        &self,
        entity_type: EntityType,
        scope: &ProductScope,
    ) -> RepoResult<Vec<CatalogItem>>;

    /// Entry point for the catalog editor; the taxonomy core never creates items
    async fn insert_item(&self, data: CatalogItemCreate) -> RepoResult<CatalogItem>;

    /// Category rows ordered by display order (NULL as 0)
    async fn list_categories(&self, entity_type: EntityType) -> RepoResult<Vec<CategoryMetadata>>;

    async fn find_category(
        &self,
        entity_type: EntityType,
        key: &str,
    ) -> RepoResult<Option<CategoryMetadata>>;

    /// Subcategory rows ordered by category then display order (NULL as 0)
    async fn list_subcategories(
        &self,
        entity_type: EntityType,
    ) -> RepoResult<Vec<SubcategoryMetadata>>;

    async fn find_subcategory(
        &self,
        entity_type: EntityType,
        category: &str,
        key: &str,
    ) -> RepoResult<Option<SubcategoryMetadata>>;

    /// Apply every op of the batch, or none of them.
    ///
    /// Returns the number of rows each op touched, in batch order.
    async fn apply(&self, batch: WriteBatch) -> RepoResult<Vec<u64>>;
}

/// Collection a write lands in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteTarget {
    CatalogItems,
    CategoryMetadata,
    SubcategoryMetadata,
}

/// A single write against one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    InsertCategory(CategoryMetadataCreate),
    UpdateCategory {
        id: i64,
        category_key: String,
        category_label: String,
    },
    DeleteCategory {
        id: i64,
    },
    InsertSubcategory(SubcategoryMetadataCreate),
    UpdateSubcategory {
        id: i64,
        subcategory_key: String,
        subcategory_label: String,
        display_order: Option<i32>,
    },
    DeleteSubcategory {
        id: i64,
    },
    DeleteSubcategoriesOf {
        entity_type: EntityType,
        category: String,
    },
    /// Re-scope subcategory rows from one parent key to another
    RekeySubcategoryParent {
        entity_type: EntityType,
        from: String,
        to: String,
    },
    RekeyItemCategory {
        entity_type: EntityType,
        from: String,
        to: String,
    },
    RekeyItemSubcategory {
        entity_type: EntityType,
        category: String,
        from: String,
        to: String,
    },
    SetItemSortOrder {
        id: i64,
        sort_order: i32,
    },
}

impl WriteOp {
    pub fn target(&self) -> WriteTarget {
        match self {
            Self::InsertCategory(_) | Self::UpdateCategory { .. } | Self::DeleteCategory { .. } => {
                WriteTarget::CategoryMetadata
            }
            Self::InsertSubcategory(_)
            | Self::UpdateSubcategory { .. }
            | Self::DeleteSubcategory { .. }
            | Self::DeleteSubcategoriesOf { .. }
            | Self::RekeySubcategoryParent { .. } => WriteTarget::SubcategoryMetadata,
            Self::RekeyItemCategory { .. }
            | Self::RekeyItemSubcategory { .. }
            | Self::SetItemSortOrder { .. } => WriteTarget::CatalogItems,
        }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertCategory(data) => write!(f, "insert category '{}'", data.category_key),
            Self::UpdateCategory { id, category_key, .. } => {
                write!(f, "update category {id} -> '{category_key}'")
            }
            Self::DeleteCategory { id } => write!(f, "delete category {id}"),
            Self::InsertSubcategory(data) => write!(
                f,
                "insert subcategory '{}:{}'",
                data.category, data.subcategory_key
            ),
            Self::UpdateSubcategory { id, subcategory_key, .. } => {
                write!(f, "update subcategory {id} -> '{subcategory_key}'")
            }
            Self::DeleteSubcategory { id } => write!(f, "delete subcategory {id}"),
            Self::DeleteSubcategoriesOf { category, .. } => {
                write!(f, "delete subcategories of '{category}'")
            }
            Self::RekeySubcategoryParent { from, to, .. } => {
                write!(f, "re-scope subcategories '{from}' -> '{to}'")
            }
            Self::RekeyItemCategory { from, to, .. } => {
                write!(f, "re-key item category '{from}' -> '{to}'")
            }
            Self::RekeyItemSubcategory { category, from, to, .. } => {
                write!(f, "re-key item subcategory '{category}:{from}' -> '{to}'")
            }
            Self::SetItemSortOrder { id, sort_order } => {
                write!(f, "set sort_order of item {id} to {sort_order}")
            }
        }
    }
}

/// Ordered unit of work
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: WriteOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn with(mut self, op: WriteOp) -> Self {
        self.ops.push(op);
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WriteOp> {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_report_their_collection() {
        let rekey = WriteOp::RekeyItemCategory {
            entity_type: EntityType::Equipment,
            from: "a".into(),
            to: "b".into(),
        };
        assert_eq!(rekey.target(), WriteTarget::CatalogItems);
        assert_eq!(
            WriteOp::DeleteSubcategoriesOf {
                entity_type: EntityType::Equipment,
                category: "a".into(),
            }
            .target(),
            WriteTarget::SubcategoryMetadata
        );
        assert_eq!(
            WriteOp::DeleteCategory { id: 1 }.target(),
            WriteTarget::CategoryMetadata
        );
        assert_eq!(rekey.to_string(), "re-key item category 'a' -> 'b'");
    }

    #[test]
    fn batch_keeps_insertion_order() {
        let batch = WriteBatch::new()
            .with(WriteOp::SetItemSortOrder { id: 1, sort_order: 20 })
            .with(WriteOp::SetItemSortOrder { id: 2, sort_order: 10 });
        let ids: Vec<_> = batch
            .iter()
            .map(|op| match op {
                WriteOp::SetItemSortOrder { id, .. } => *id,
                _ => 0,
            })
            .collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(batch.len(), 2);
        assert!(WriteBatch::new().is_empty());
    }
}
