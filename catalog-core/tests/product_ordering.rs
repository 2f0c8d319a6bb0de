use catalog_core::{
    CatalogBackend, DbService, Direction, ProductScope, SqliteBackend, TaxonomyError,
    TaxonomyService,
};
use shared::models::{CatalogItem, CatalogItemCreate, EntityType};
use std::sync::Arc;

const EQ: EntityType = EntityType::Equipment;

async fn seeded(items: &[(&str, Option<i32>)]) -> (TaxonomyService<SqliteBackend>, ProductScope) {
    let db = DbService::in_memory().await.unwrap();
    let service = TaxonomyService::new(Arc::new(SqliteBackend::new(db.pool)), EQ);
    for (name, order) in items {
        let mut data = CatalogItemCreate::new(EQ, "polishing", Some("cloths"), *name);
        data.sort_order = *order;
        service.backend().insert_item(data).await.unwrap();
    }
    // Same category, different subcategory: never part of the scope below.
    service
        .backend()
        .insert_item(CatalogItemCreate::new(EQ, "polishing", Some("suspensions"), "AAA"))
        .await
        .unwrap();
    (service, ProductScope::subcategory("polishing", "cloths"))
}

fn names(items: &[CatalogItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn test_listing_puts_unranked_last() {
    let (service, scope) = seeded(&[("X", None), ("Y", Some(5)), ("Z", None)]).await;
    let items = service.list_products(&scope).await.unwrap();
    assert_eq!(names(&items), vec!["Y", "X", "Z"]);

    let whole = service
        .list_products(&ProductScope::category("polishing"))
        .await
        .unwrap();
    assert_eq!(names(&whole), vec!["Y", "AAA", "X", "Z"]);
}

#[tokio::test]
async fn test_move_up_swaps_with_synthetic_key() {
    let (service, scope) = seeded(&[("X", None), ("Y", Some(5)), ("Z", None)]).await;

    let items = service.move_product(&scope, 1, Direction::Up).await.unwrap();
    assert_eq!(names(&items), vec!["X", "Y", "Z"]);
    assert_eq!(items[0].sort_order, Some(5));
    assert_eq!(items[1].sort_order, Some(20));
    assert_eq!(items[2].sort_order, None);
}

#[tokio::test]
async fn test_move_down_then_up_restores_order() {
    let (service, scope) = seeded(&[("A", None), ("B", None), ("C", None)]).await;

    let items = service.move_product(&scope, 0, Direction::Down).await.unwrap();
    assert_eq!(names(&items), vec!["B", "A", "C"]);
    let items = service.move_product(&scope, 1, Direction::Up).await.unwrap();
    assert_eq!(names(&items), vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_boundary_moves_keep_keys() {
    let (service, scope) = seeded(&[("A", None), ("B", Some(3))]).await;
    let before = service.list_products(&scope).await.unwrap();

    let after = service.move_product(&scope, 0, Direction::Up).await.unwrap();
    assert_eq!(after, before);
    let after = service.move_product(&scope, 1, Direction::Down).await.unwrap();
    assert_eq!(after, before);

    let err = service.move_product(&scope, 5, Direction::Down).await.unwrap_err();
    assert!(matches!(err, TaxonomyError::Validation(_)));
}

#[tokio::test]
async fn test_set_order_allows_ties() {
    let (service, scope) = seeded(&[("B", Some(1)), ("A", Some(2))]).await;
    let items = service.list_products(&scope).await.unwrap();
    let b = items[0].id;
    let a = items[1].id;

    let items = service.set_product_order(&scope, a, 1).await.unwrap();
    assert_eq!(names(&items), vec!["A", "B"]);
    assert!(items.iter().all(|i| i.sort_order == Some(1)));

    let items = service.set_product_order(&scope, b, 0).await.unwrap();
    assert_eq!(names(&items), vec!["B", "A"]);

    let err = service.set_product_order(&scope, -1, 0).await.unwrap_err();
    assert!(matches!(err, TaxonomyError::ItemNotFound { id: -1 }));
}
