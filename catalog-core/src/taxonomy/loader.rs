//! Taxonomy loader

use super::error::{TaxonomyError, TaxonomyResult};
use super::store::{CategoryEntry, SubcategoryEntry, TaxonomyStore};
use crate::backend::CatalogBackend;
use shared::models::{CategoryMetadata, EntityType, ItemKeys, SubcategoryMetadata};
use std::collections::{BTreeMap, HashMap};

/// Builds a [`TaxonomyStore`] from the three backing collections
pub struct TaxonomyLoader<'a, B: CatalogBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: CatalogBackend + ?Sized> TaxonomyLoader<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Read everything and build a fresh store.
    ///
    /// All or nothing: the first failed read aborts with `LoadFailed`.
    pub async fn load(&self, entity_type: EntityType) -> TaxonomyResult<TaxonomyStore> {
        let keys = self
            .backend
            .item_keys(entity_type)
            .await
            .map_err(TaxonomyError::load)?;
        let categories = self
            .backend
            .list_categories(entity_type)
            .await
            .map_err(TaxonomyError::load)?;
        let subcategories = self
            .backend
            .list_subcategories(entity_type)
            .await
            .map_err(TaxonomyError::load)?;

        let store = build_store(entity_type, &keys, categories, subcategories);
        tracing::debug!(
            entity_type = %entity_type,
            categories = store.len(),
            items = keys.len(),
            "Taxonomy loaded"
        );
        Ok(store)
    }
}

#[derive(Default)]
struct Counts {
    by_category: HashMap<String, usize>,
    by_subcategory: HashMap<(String, String), usize>,
}

impl Counts {
    fn from_keys(keys: &[ItemKeys]) -> Self {
        let mut counts = Self::default();
        // Blank keys never form a category of their own.
        for k in keys.iter().filter(|k| !k.category.trim().is_empty()) {
            *counts.by_category.entry(k.category.clone()).or_default() += 1;
            if let Some(sub) = k.subcategory.as_ref().filter(|s| !s.trim().is_empty()) {
                *counts
                    .by_subcategory
                    .entry((k.category.clone(), sub.clone()))
                    .or_default() += 1;
            }
        }
        counts
    }

    fn subcategory(&self, category: &str, key: &str) -> usize {
        self.by_subcategory
            .get(&(category.to_string(), key.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

fn build_store(
    entity_type: EntityType,
    keys: &[ItemKeys],
    categories: Vec<CategoryMetadata>,
    subcategories: Vec<SubcategoryMetadata>,
) -> TaxonomyStore {
    let counts = Counts::from_keys(keys);

    let mut subs_by_category: HashMap<String, Vec<SubcategoryMetadata>> = HashMap::new();
    for sub in subcategories {
        subs_by_category.entry(sub.category.clone()).or_default().push(sub);
    }

    let metadata: HashMap<String, CategoryMetadata> = categories
        .into_iter()
        .map(|c| (c.category_key.clone(), c))
        .collect();

    let mut entries: BTreeMap<String, CategoryEntry> = BTreeMap::new();
    let observed = counts.by_category.keys().chain(metadata.keys());
    for key in observed {
        if entries.contains_key(key) {
            continue;
        }
        let meta = metadata.get(key);

        let mut subs: Vec<SubcategoryEntry> = subs_by_category
            .get(key)
            .map(|rows| {
                rows.iter()
                    .map(|s| SubcategoryEntry {
                        key: s.subcategory_key.clone(),
                        label: s.subcategory_label.clone(),
                        metadata_id: s.id,
                        display_order: s.display_order,
                        item_count: counts.subcategory(key, &s.subcategory_key),
                    })
                    .collect()
            })
            .unwrap_or_default();
        subs.sort_by_key(|s| s.display_order.unwrap_or(0));

        entries.insert(
            key.clone(),
            CategoryEntry {
                key: key.clone(),
                label: meta
                    .map(|m| m.category_label.clone())
                    .unwrap_or_else(|| key.clone()),
                metadata_id: meta.map(|m| m.id),
                item_count: counts.by_category.get(key).copied().unwrap_or(0),
                subcategories: subs,
            },
        );
    }

    TaxonomyStore::from_entries(entity_type, entries.into_values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use shared::models::CatalogItemCreate;

    fn keys(pairs: &[(&str, Option<&str>)]) -> Vec<ItemKeys> {
        pairs
            .iter()
            .map(|(c, s)| ItemKeys {
                category: c.to_string(),
                subcategory: s.map(str::to_string),
            })
            .collect()
    }

    fn sub(id: i64, category: &str, key: &str, order: Option<i32>) -> SubcategoryMetadata {
        SubcategoryMetadata {
            id,
            entity_type: EntityType::Equipment,
            category: category.into(),
            subcategory_key: key.into(),
            subcategory_label: key.to_uppercase(),
            display_order: order,
            is_active: true,
        }
    }

    #[test]
    fn implicit_categories_fall_back_to_raw_key() {
        let store = build_store(
            EntityType::Equipment,
            &keys(&[("cutting", None), ("cutting", Some("blades"))]),
            vec![],
            vec![],
        );
        let cutting = store.get("cutting").unwrap();
        assert_eq!(cutting.label, "cutting");
        assert!(cutting.is_implicit());
        assert_eq!(cutting.item_count, 2);
        assert!(cutting.subcategories.is_empty());
    }

    #[test]
    fn subcategories_carry_live_counts_in_display_order() {
        let store = build_store(
            EntityType::Equipment,
            &keys(&[("cutting", Some("blades")), ("cutting", Some("blades"))]),
            vec![],
            vec![
                sub(1, "cutting", "wheels", Some(2)),
                sub(2, "cutting", "blades", None),
                sub(3, "cutting", "fluids", Some(1)),
            ],
        );
        let subs = &store.get("cutting").unwrap().subcategories;
        let order: Vec<_> = subs.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(order, vec!["blades", "fluids", "wheels"]);
        assert_eq!(subs[0].item_count, 2);
        assert_eq!(subs[1].item_count, 0);
    }

    #[test]
    fn blank_item_categories_are_skipped() {
        let store = build_store(
            EntityType::Equipment,
            &keys(&[("", None), ("  ", Some("blades")), ("cutting", Some(""))]),
            vec![],
            vec![],
        );
        assert!(!store.contains(""));
        assert!(!store.contains("  "));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("cutting").unwrap().item_count, 1);
    }

    #[test]
    fn metadata_only_category_is_kept_with_zero_items() {
        let meta = CategoryMetadata {
            id: 7,
            entity_type: EntityType::Equipment,
            category_key: "mounting".into(),
            category_label: "Mounting".into(),
            display_order: Some(0),
            is_active: true,
        };
        let store = build_store(EntityType::Equipment, &[], vec![meta], vec![]);
        let mounting = store.get("mounting").unwrap();
        assert_eq!(mounting.label, "Mounting");
        assert_eq!(mounting.metadata_id, Some(7));
        assert_eq!(mounting.item_count, 0);
        assert_eq!(store.catalog_categories().count(), 0);
    }

    #[tokio::test]
    async fn read_failure_aborts_load() {
        let backend = MemoryBackend::new();
        backend
            .insert_item(CatalogItemCreate::new(EntityType::Equipment, "cutting", None, "Saw"))
            .await
            .unwrap();
        backend.fail_reads();

        let err = TaxonomyLoader::new(&backend)
            .load(EntityType::Equipment)
            .await
            .unwrap_err();
        assert!(matches!(err, TaxonomyError::LoadFailed { .. }));
    }

    #[tokio::test]
    async fn scopes_by_entity_type() {
        let backend = MemoryBackend::new();
        backend
            .insert_item(CatalogItemCreate::new(EntityType::Consumables, "etchants", None, "Nital"))
            .await
            .unwrap();

        let loader = TaxonomyLoader::new(&backend);
        assert!(loader.load(EntityType::Equipment).await.unwrap().is_empty());
        assert_eq!(loader.load(EntityType::Consumables).await.unwrap().len(), 1);
    }
}
