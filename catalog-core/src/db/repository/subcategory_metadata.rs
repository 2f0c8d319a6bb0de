//! Subcategory Metadata Repository

use super::RepoResult;
use shared::models::{EntityType, SubcategoryMetadata, SubcategoryMetadataCreate};
use sqlx::{SqliteExecutor, SqlitePool};

/// All subcategory rows of a catalog, grouped by category then display order
pub async fn find_all(
    pool: &SqlitePool,
    entity_type: EntityType,
) -> RepoResult<Vec<SubcategoryMetadata>> {
    let rows = sqlx::query_as::<_, SubcategoryMetadata>(
        "SELECT id, entity_type, category, subcategory_key, subcategory_label, display_order, is_active FROM subcategory_metadata WHERE entity_type = ? ORDER BY category, COALESCE(display_order, 0), subcategory_key",
    )
    .bind(entity_type.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_key(
    pool: &SqlitePool,
    entity_type: EntityType,
    category: &str,
    key: &str,
) -> RepoResult<Option<SubcategoryMetadata>> {
    let row = sqlx::query_as::<_, SubcategoryMetadata>(
        "SELECT id, entity_type, category, subcategory_key, subcategory_label, display_order, is_active FROM subcategory_metadata WHERE entity_type = ? AND category = ? AND subcategory_key = ? LIMIT 1",
    )
    .bind(entity_type.as_str())
    .bind(category)
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a row and return its id
pub async fn create<'e, E>(executor: E, data: &SubcategoryMetadataCreate) -> RepoResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO subcategory_metadata (id, entity_type, category, subcategory_key, subcategory_label, display_order, is_active) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(data.entity_type.as_str())
    .bind(&data.category)
    .bind(&data.subcategory_key)
    .bind(&data.subcategory_label)
    .bind(data.display_order)
    .bind(data.is_active)
    .execute(executor)
    .await?;
    Ok(id)
}

pub async fn update<'e, E>(
    executor: E,
    id: i64,
    key: &str,
    label: &str,
    display_order: Option<i32>,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "UPDATE subcategory_metadata SET subcategory_key = ?1, subcategory_label = ?2, display_order = ?3 WHERE id = ?4",
    )
    .bind(key)
    .bind(label)
    .bind(display_order)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

/// Re-scope every subcategory of category `from` to category `to`
pub async fn rekey_category<'e, E>(
    executor: E,
    entity_type: EntityType,
    from: &str,
    to: &str,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "UPDATE subcategory_metadata SET category = ?1 WHERE entity_type = ?2 AND category = ?3",
    )
    .bind(to)
    .bind(entity_type.as_str())
    .bind(from)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("DELETE FROM subcategory_metadata WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}

pub async fn delete_by_category<'e, E>(
    executor: E,
    entity_type: EntityType,
    category: &str,
) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("DELETE FROM subcategory_metadata WHERE entity_type = ? AND category = ?")
        .bind(entity_type.as_str())
        .bind(category)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}
