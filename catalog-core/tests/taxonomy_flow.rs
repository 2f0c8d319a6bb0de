use catalog_core::{
    CatalogBackend, DbService, ErrorCode, MemoryBackend, ProductScope, SqliteBackend,
    TaxonomyError, TaxonomyService, TaxonomyStore,
};
use shared::models::{CatalogItemCreate, EntityType};
use std::sync::Arc;

const EQ: EntityType = EntityType::Equipment;

async fn sqlite_service() -> TaxonomyService<SqliteBackend> {
    let db = DbService::in_memory().await.unwrap();
    TaxonomyService::new(Arc::new(SqliteBackend::new(db.pool)), EQ)
}

async fn add_item<B: CatalogBackend + ?Sized>(
    service: &TaxonomyService<B>,
    category: &str,
    subcategory: Option<&str>,
    name: &str,
) -> i64 {
    service
        .backend()
        .insert_item(CatalogItemCreate::new(EQ, category, subcategory, name))
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_empty_store_to_counted_subcategory() {
    let service = sqlite_service().await;
    let store = service.load_taxonomy().await.unwrap();
    assert!(store.is_empty());

    let store = service
        .create_category(&store, "sectioning", "Sectioning")
        .await
        .unwrap();
    assert_eq!(store.len(), 1);
    let entry = store.get("sectioning").unwrap();
    assert_eq!((entry.item_count, entry.subcategories.len()), (0, 0));

    let store = service
        .create_subcategory(
            &store,
            Some("sectioning"),
            "automated-sectioning",
            "Automated Sectioning",
            Some(0),
        )
        .await
        .unwrap();
    let entry = store.get("sectioning").unwrap();
    assert_eq!(entry.subcategories.len(), 1);
    assert_eq!(entry.item_count, 0);

    add_item(&service, "sectioning", Some("automated-sectioning"), "Saw 3000").await;
    let store = service.load_taxonomy().await.unwrap();
    let entry = store.get("sectioning").unwrap();
    assert_eq!(entry.item_count, 1);
    assert_eq!(entry.subcategory("automated-sectioning").unwrap().item_count, 1);
}

#[tokio::test]
async fn test_create_round_trips_normalized_key() {
    let service = sqlite_service().await;
    let store = service.load_taxonomy().await.unwrap();

    let store = service
        .create_category(&store, " Sectioning ", "Sectioning")
        .await
        .unwrap();
    assert!(service.backend().find_category(EQ, "sectioning").await.unwrap().is_some());

    let reloaded = service.load_taxonomy().await.unwrap();
    assert_eq!(reloaded, store);
    assert_eq!(reloaded.get("sectioning").unwrap().label, "Sectioning");
}

#[tokio::test]
async fn test_duplicate_create_leaves_store_unchanged() {
    let service = sqlite_service().await;
    add_item(&service, "polishing", None, "Cloth").await;
    let store = service.load_taxonomy().await.unwrap();
    let store = service
        .create_category(&store, "mounting", "Mounting")
        .await
        .unwrap();

    for key in ["polishing", "MOUNTING"] {
        let err = service.create_category(&store, key, "Again").await.unwrap_err();
        assert!(matches!(err, TaxonomyError::DuplicateKey { .. }), "{key}: {err}");
        assert_eq!(err.code(), ErrorCode::CategoryKeyExists);
    }
    assert_eq!(service.load_taxonomy().await.unwrap(), store);
}

#[tokio::test]
async fn test_delete_is_not_repeatable() {
    let service = sqlite_service().await;
    let store = service.load_taxonomy().await.unwrap();
    let store = service.create_category(&store, "etching", "Etching").await.unwrap();
    let store = service
        .create_subcategory(&store, Some("etching"), "reagents", "Reagents", None)
        .await
        .unwrap();

    let store = service.delete_category(&store, "etching").await.unwrap();
    assert!(!store.contains("etching"));
    assert!(service.backend().find_subcategory(EQ, "etching", "reagents").await.unwrap().is_none());

    let err = service.delete_category(&store, "etching").await.unwrap_err();
    assert!(matches!(err, TaxonomyError::CategoryNotFound { .. }));
}

#[tokio::test]
async fn test_delete_keeps_items_as_implicit_category() {
    let service = sqlite_service().await;
    add_item(&service, "hardness", None, "Rockwell Tester").await;
    let store = service.load_taxonomy().await.unwrap();
    let store = service
        .rename_category(&store, "hardness", "hardness", "Hardness Testing")
        .await
        .unwrap();
    assert!(!store.get("hardness").unwrap().is_implicit());

    let store = service.delete_category(&store, "hardness").await.unwrap();
    let entry = store.get("hardness").unwrap();
    assert!(entry.is_implicit());
    assert_eq!(entry.label, "hardness");
    assert_eq!(entry.item_count, 1);
}

#[tokio::test]
async fn test_rename_cascades_items_and_subcategories() {
    let service = sqlite_service().await;
    for name in ["One", "Two", "Three"] {
        add_item(&service, "a", Some("x"), name).await;
    }
    add_item(&service, "other", None, "Untouched").await;
    let store = service.load_taxonomy().await.unwrap();
    let store = service.create_subcategory(&store, Some("a"), "x", "X", None).await.unwrap();
    let store = service.create_subcategory(&store, Some("a"), "y", "Y", None).await.unwrap();

    let store = service.rename_category(&store, "a", "B", "Bee").await.unwrap();

    assert!(!store.contains("a"));
    let b = store.get("b").unwrap();
    assert_eq!(b.label, "Bee");
    assert_eq!(b.item_count, 3);
    let subs: Vec<_> = b.subcategories.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(subs, vec!["x", "y"]);
    assert_eq!(b.subcategory("x").unwrap().item_count, 3);

    let items = service.list_products(&ProductScope::category("a")).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(store.get("other").unwrap().item_count, 1);
}

#[tokio::test]
async fn test_rename_without_items_is_legal() {
    let service = sqlite_service().await;
    let store = service.load_taxonomy().await.unwrap();
    let store = service.create_category(&store, "a", "A").await.unwrap();

    let store = service.rename_category(&store, "a", "b", "B").await.unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("b").unwrap().item_count, 0);
}

#[tokio::test]
async fn test_sqlite_rolls_back_partial_rename() {
    let service = sqlite_service().await;
    add_item(&service, "a", Some("x"), "Item").await;
    let store = service.load_taxonomy().await.unwrap();
    // Parent "a" is implicit: known from its items, no metadata row.
    let store = service.create_subcategory(&store, Some("a"), "x", "X", None).await.unwrap();

    sqlx::query(
        "CREATE TRIGGER block_rescope BEFORE UPDATE ON subcategory_metadata BEGIN SELECT RAISE(ABORT, 'blocked'); END",
    )
    .execute(service.backend().pool())
    .await
    .unwrap();

    let err = service.rename_category(&store, "a", "b", "B").await.unwrap_err();
    assert!(matches!(err, TaxonomyError::RenameFailed { .. }), "{err}");
    assert_eq!(err.code(), ErrorCode::RenameFailed);

    // Item re-key ran first inside the transaction and must be rolled back.
    let reloaded = service.load_taxonomy().await.unwrap();
    assert_eq!(reloaded.get("a").unwrap().item_count, 1);
    assert!(!reloaded.contains("b"));
    assert_eq!(reloaded, store);
}

#[tokio::test]
async fn test_subcategory_lifecycle() {
    let service = sqlite_service().await;
    let store = service.load_taxonomy().await.unwrap();
    let store = service.create_category(&store, "cutting", "Cutting").await.unwrap();

    let err = service
        .create_subcategory(&store, None, "blades", "Blades", None)
        .await
        .unwrap_err();
    assert!(matches!(err, TaxonomyError::CategoryNotSelected));

    let store = service
        .create_subcategory(&store, Some("cutting"), "blades", "Blades", None)
        .await
        .unwrap();
    add_item(&service, "cutting", Some("blades"), "Diamond Blade").await;

    let store = service
        .rename_subcategory(&store, "cutting", "blades", "Wafering Blades", "Wafering Blades", None)
        .await
        .unwrap();
    let sub = store
        .get("cutting")
        .unwrap()
        .subcategory("wafering-blades")
        .unwrap();
    assert_eq!(sub.item_count, 1);
    assert_eq!(sub.display_order, Some(0));

    let store = service
        .delete_subcategory(&store, "cutting", "wafering-blades")
        .await
        .unwrap();
    assert!(store.get("cutting").unwrap().subcategories.is_empty());
    let items = service
        .list_products(&ProductScope::subcategory("cutting", "wafering-blades"))
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("catalog.db");

    let expected: TaxonomyStore = {
        let db = DbService::new(&path).await.unwrap();
        let service = TaxonomyService::new(Arc::new(SqliteBackend::new(db.pool.clone())), EQ);
        let store = service.load_taxonomy().await.unwrap();
        let store = service.create_category(&store, "mounting", "Mounting").await.unwrap();
        db.pool.close().await;
        store
    };

    let db = DbService::new(&path).await.unwrap();
    let service = TaxonomyService::new(Arc::new(SqliteBackend::new(db.pool)), EQ);
    assert_eq!(service.load_taxonomy().await.unwrap(), expected);
}

#[tokio::test]
async fn test_memory_backend_load_failure_is_fatal() {
    let backend = Arc::new(MemoryBackend::new());
    let service = TaxonomyService::new(Arc::clone(&backend), EQ);
    let store = service.load_taxonomy().await.unwrap();

    backend.fail_reads();
    let err = service.create_category(&store, "a", "A").await.unwrap_err();
    assert!(matches!(err, TaxonomyError::LoadFailed { .. }));

    let app: catalog_core::AppError = err.into();
    assert_eq!(app.code, ErrorCode::TaxonomyLoadFailed);
}
