//! Catalog Item Repository

use super::{RepoError, RepoResult};
use shared::models::{CatalogItem, CatalogItemCreate, EntityType, ItemKeys};
use sqlx::{SqliteExecutor, SqlitePool};

/// Classification pairs of every item of one catalog
pub async fn find_keys(pool: &SqlitePool, entity_type: EntityType) -> RepoResult<Vec<ItemKeys>> {
    let keys = sqlx::query_as::<_, ItemKeys>(
        "SELECT category, subcategory FROM catalog_item WHERE entity_type = ? ORDER BY category",
    )
    .bind(entity_type.as_str())
    .fetch_all(pool)
    .await?;
    Ok(keys)
}

/// Items of a category (and optionally one subcategory), ranked for display:
/// sort_order ascending with NULLs last, then name
pub async fn find_in_scope(
    pool: &SqlitePool,
    entity_type: EntityType,
    category: &str,
    subcategory: Option<&str>,
) -> RepoResult<Vec<CatalogItem>> {
    let items = match subcategory {
        Some(sub) => {
            sqlx::query_as::<_, CatalogItem>(
                "SELECT id, entity_type, category, subcategory, name, status, sort_order, description, image_url FROM catalog_item WHERE entity_type = ? AND category = ? AND subcategory = ? ORDER BY sort_order IS NULL, sort_order, name",
            )
            .bind(entity_type.as_str())
            .bind(category)
            .bind(sub)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, CatalogItem>(
                "SELECT id, entity_type, category, subcategory, name, status, sort_order, description, image_url FROM catalog_item WHERE entity_type = ? AND category = ? ORDER BY sort_order IS NULL, sort_order, name",
            )
            .bind(entity_type.as_str())
            .bind(category)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<CatalogItem>> {
    let item = sqlx::query_as::<_, CatalogItem>(
        "SELECT id, entity_type, category, subcategory, name, status, sort_order, description, image_url FROM catalog_item WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(item)
}

pub async fn create(pool: &SqlitePool, data: CatalogItemCreate) -> RepoResult<CatalogItem> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO catalog_item (id, entity_type, category, subcategory, name, status, sort_order, description, image_url) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(id)
    .bind(data.entity_type.as_str())
    .bind(&data.category)
    .bind(&data.subcategory)
    .bind(&data.name)
    .bind(data.status.as_str())
    .bind(data.sort_order)
    .bind(&data.description)
    .bind(&data.image_url)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create catalog item".into()))
}

/// Move every item of category `from` to category `to`
pub async fn rekey_category<'e, E>(
    executor: E,
    entity_type: EntityType,
    from: &str,
    to: &str,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("UPDATE catalog_item SET category = ?1 WHERE entity_type = ?2 AND category = ?3")
        .bind(to)
        .bind(entity_type.as_str())
        .bind(from)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}

/// Move every item of `(category, from)` to subcategory `to`
pub async fn rekey_subcategory<'e, E>(
    executor: E,
    entity_type: EntityType,
    category: &str,
    from: &str,
    to: &str,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "UPDATE catalog_item SET subcategory = ?1 WHERE entity_type = ?2 AND category = ?3 AND subcategory = ?4",
    )
    .bind(to)
    .bind(entity_type.as_str())
    .bind(category)
    .bind(from)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn set_sort_order<'e, E>(executor: E, id: i64, sort_order: i32) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("UPDATE catalog_item SET sort_order = ? WHERE id = ?")
        .bind(sort_order)
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}
