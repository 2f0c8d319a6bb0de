//! In-memory backend
//!
//! Mirrors the SQLite schema closely enough to run the taxonomy core without
//! a database: per-scope uniqueness, display ordering and all-or-nothing
//! batches. Faults can be injected per collection to exercise the partial
//! failure paths of the mutators.

use super::{CatalogBackend, WriteBatch, WriteOp, WriteTarget};
use crate::db::repository::{RepoError, RepoResult};
use crate::products::{ProductScope, compare_for_display};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use shared::models::{
    CatalogItem, CatalogItemCreate, CategoryMetadata, EntityType, ItemKeys, SubcategoryMetadata,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Default)]
struct Collections {
    items: Vec<CatalogItem>,
    categories: Vec<CategoryMetadata>,
    subcategories: Vec<SubcategoryMetadata>,
    next_id: i64,
}

impl Collections {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn apply_op(&mut self, op: &WriteOp) -> RepoResult<u64> {
        let rows = match op {
            WriteOp::InsertCategory(data) => {
                let id = self.allocate_id();
                self.categories.push(CategoryMetadata {
                    id,
                    entity_type: data.entity_type,
                    category_key: data.category_key.clone(),
                    category_label: data.category_label.clone(),
                    display_order: data.display_order,
                    is_active: data.is_active,
                });
                1
            }
            WriteOp::UpdateCategory {
                id,
                category_key,
                category_label,
            } => {
                let mut rows = 0;
                for row in self.categories.iter_mut().filter(|c| c.id == *id) {
                    row.category_key = category_key.clone();
                    row.category_label = category_label.clone();
                    rows += 1;
                }
                rows
            }
            WriteOp::DeleteCategory { id } => {
                let before = self.categories.len();
                self.categories.retain(|c| c.id != *id);
                (before - self.categories.len()) as u64
            }
            WriteOp::InsertSubcategory(data) => {
                let id = self.allocate_id();
                self.subcategories.push(SubcategoryMetadata {
                    id,
                    entity_type: data.entity_type,
                    category: data.category.clone(),
                    subcategory_key: data.subcategory_key.clone(),
                    subcategory_label: data.subcategory_label.clone(),
                    display_order: data.display_order,
                    is_active: data.is_active,
                });
                1
            }
            WriteOp::UpdateSubcategory {
                id,
                subcategory_key,
                subcategory_label,
                display_order,
            } => {
                let mut rows = 0;
                for row in self.subcategories.iter_mut().filter(|s| s.id == *id) {
                    row.subcategory_key = subcategory_key.clone();
                    row.subcategory_label = subcategory_label.clone();
                    row.display_order = *display_order;
                    rows += 1;
                }
                rows
            }
            WriteOp::DeleteSubcategory { id } => {
                let before = self.subcategories.len();
                self.subcategories.retain(|s| s.id != *id);
                (before - self.subcategories.len()) as u64
            }
            WriteOp::DeleteSubcategoriesOf {
                entity_type,
                category,
            } => {
                let before = self.subcategories.len();
                self.subcategories
                    .retain(|s| !(s.entity_type == *entity_type && s.category == *category));
                (before - self.subcategories.len()) as u64
            }
            WriteOp::RekeySubcategoryParent {
                entity_type,
                from,
                to,
            } => {
                let mut rows = 0;
                for row in self
                    .subcategories
                    .iter_mut()
                    .filter(|s| s.entity_type == *entity_type && s.category == *from)
                {
                    row.category = to.clone();
                    rows += 1;
                }
                rows
            }
            WriteOp::RekeyItemCategory {
                entity_type,
                from,
                to,
            } => {
                let mut rows = 0;
                for item in self
                    .items
                    .iter_mut()
                    .filter(|i| i.entity_type == *entity_type && i.category == *from)
                {
                    item.category = to.clone();
                    rows += 1;
                }
                rows
            }
            WriteOp::RekeyItemSubcategory {
                entity_type,
                category,
                from,
                to,
            } => {
                let mut rows = 0;
                for item in self.items.iter_mut().filter(|i| {
                    i.entity_type == *entity_type
                        && i.category == *category
                        && i.subcategory.as_deref() == Some(from.as_str())
                }) {
                    item.subcategory = Some(to.clone());
                    rows += 1;
                }
                rows
            }
            WriteOp::SetItemSortOrder { id, sort_order } => {
                let mut rows = 0;
                for item in self.items.iter_mut().filter(|i| i.id == *id) {
                    item.sort_order = Some(*sort_order);
                    rows += 1;
                }
                rows
            }
        };
        self.check_unique(op.target())?;
        Ok(rows)
    }

    /// Same constraints as the UNIQUE indexes of the metadata tables
    fn check_unique(&self, target: WriteTarget) -> RepoResult<()> {
        match target {
            WriteTarget::CategoryMetadata => {
                let mut seen = HashSet::new();
                for row in &self.categories {
                    if !seen.insert((row.entity_type, row.category_key.as_str())) {
                        return Err(RepoError::Duplicate(format!(
                            "category_metadata ({}, {})",
                            row.entity_type, row.category_key
                        )));
                    }
                }
            }
            WriteTarget::SubcategoryMetadata => {
                let mut seen = HashSet::new();
                for row in &self.subcategories {
                    let key = (
                        row.entity_type,
                        row.category.as_str(),
                        row.subcategory_key.as_str(),
                    );
                    if !seen.insert(key) {
                        return Err(RepoError::Duplicate(format!(
                            "subcategory_metadata ({}, {}, {})",
                            row.entity_type, row.category, row.subcategory_key
                        )));
                    }
                }
            }
            WriteTarget::CatalogItems => {}
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Faults {
    writes: HashSet<WriteTarget>,
    reads: bool,
}

/// [`CatalogBackend`] holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<Collections>,
    faults: Mutex<Faults>,
    batches_applied: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any batch that touches `target`
    pub fn fail_on(&self, target: WriteTarget) {
        self.faults.lock().writes.insert(target);
    }

    /// Reject every read
    pub fn fail_reads(&self) {
        self.faults.lock().reads = true;
    }

    pub fn clear_faults(&self) {
        *self.faults.lock() = Faults::default();
    }

    /// Number of batches committed so far
    pub fn batches_applied(&self) -> usize {
        self.batches_applied.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> RepoResult<()> {
        if self.faults.lock().reads {
            return Err(RepoError::Database("injected read failure".into()));
        }
        Ok(())
    }
}

fn display_order_key(order: Option<i32>) -> i32 {
    order.unwrap_or(0)
}

#[async_trait]
impl CatalogBackend for MemoryBackend {
    async fn item_keys(&self, entity_type: EntityType) -> RepoResult<Vec<ItemKeys>> {
        self.check_read()?;
        let state = self.state.read();
        let mut keys: Vec<ItemKeys> = state
            .items
            .iter()
            .filter(|i| i.entity_type == entity_type)
            .map(|i| ItemKeys {
                category: i.category.clone(),
                subcategory: i.subcategory.clone(),
            })
            .collect();
        keys.sort_by(|a, b| a.category.cmp(&b.category));
        Ok(keys)
    }

    async fn list_items(
        &self,
        entity_type: EntityType,
        scope: &ProductScope,
    ) -> RepoResult<Vec<CatalogItem>> {
        self.check_read()?;
        let state = self.state.read();
        let mut items: Vec<CatalogItem> = state
            .items
            .iter()
            .filter(|i| i.entity_type == entity_type && scope.contains(i))
            .cloned()
            .collect();
        items.sort_by(compare_for_display);
        Ok(items)
    }

    async fn insert_item(&self, data: CatalogItemCreate) -> RepoResult<CatalogItem> {
        if self.faults.lock().writes.contains(&WriteTarget::CatalogItems) {
            return Err(RepoError::Database("injected write failure on catalog items".into()));
        }
        let mut state = self.state.write();
        let item = CatalogItem {
            id: state.allocate_id(),
            entity_type: data.entity_type,
            category: data.category,
            subcategory: data.subcategory,
            name: data.name,
            status: data.status,
            sort_order: data.sort_order,
            description: data.description,
            image_url: data.image_url,
        };
        state.items.push(item.clone());
        Ok(item)
    }

    async fn list_categories(&self, entity_type: EntityType) -> RepoResult<Vec<CategoryMetadata>> {
        self.check_read()?;
        let state = self.state.read();
        let mut rows: Vec<CategoryMetadata> = state
            .categories
            .iter()
            .filter(|c| c.entity_type == entity_type)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            display_order_key(a.display_order)
                .cmp(&display_order_key(b.display_order))
                .then_with(|| a.category_key.cmp(&b.category_key))
        });
        Ok(rows)
    }

    async fn find_category(
        &self,
        entity_type: EntityType,
        key: &str,
    ) -> RepoResult<Option<CategoryMetadata>> {
        self.check_read()?;
        Ok(self
            .state
            .read()
            .categories
            .iter()
            .find(|c| c.entity_type == entity_type && c.category_key == key)
            .cloned())
    }

    async fn list_subcategories(
        &self,
        entity_type: EntityType,
    ) -> RepoResult<Vec<SubcategoryMetadata>> {
        self.check_read()?;
        let state = self.state.read();
        let mut rows: Vec<SubcategoryMetadata> = state
            .subcategories
            .iter()
            .filter(|s| s.entity_type == entity_type)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| {
                    display_order_key(a.display_order).cmp(&display_order_key(b.display_order))
                })
                .then_with(|| a.subcategory_key.cmp(&b.subcategory_key))
        });
        Ok(rows)
    }

    async fn find_subcategory(
        &self,
        entity_type: EntityType,
        category: &str,
        key: &str,
    ) -> RepoResult<Option<SubcategoryMetadata>> {
        self.check_read()?;
        Ok(self
            .state
            .read()
            .subcategories
            .iter()
            .find(|s| {
                s.entity_type == entity_type && s.category == category && s.subcategory_key == key
            })
            .cloned())
    }


    async fn apply(&self, batch: WriteBatch) -> RepoResult<Vec<u64>> {
        {
            let faults = self.faults.lock();
            if let Some(op) = batch.iter().find(|op| faults.writes.contains(&op.target())) {
                return Err(RepoError::Database(format!("injected write failure: {op}")));
            }
        }

        let mut state = self.state.write();
        let mut staged = state.clone();
        let mut affected = Vec::with_capacity(batch.len());
        for op in batch.iter() {
            affected.push(staged.apply_op(op)?);
        }
        *state = staged;
        self.batches_applied.fetch_add(1, Ordering::SeqCst);
        Ok(affected)
    }
}
