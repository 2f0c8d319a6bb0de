//! Category Metadata Repository

use super::RepoResult;
use shared::models::{CategoryMetadata, CategoryMetadataCreate, EntityType};
use sqlx::{SqliteExecutor, SqlitePool};

/// All category rows of a catalog, NULL display_order sorting as 0
pub async fn find_all(
    pool: &SqlitePool,
    entity_type: EntityType,
) -> RepoResult<Vec<CategoryMetadata>> {
    let rows = sqlx::query_as::<_, CategoryMetadata>(
        "SELECT id, entity_type, category_key, category_label, display_order, is_active FROM category_metadata WHERE entity_type = ? ORDER BY COALESCE(display_order, 0), category_key",
    )
    .bind(entity_type.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_key(
    pool: &SqlitePool,
    entity_type: EntityType,
    key: &str,
) -> RepoResult<Option<CategoryMetadata>> {
    let row = sqlx::query_as::<_, CategoryMetadata>(
        "SELECT id, entity_type, category_key, category_label, display_order, is_active FROM category_metadata WHERE entity_type = ? AND category_key = ? LIMIT 1",
    )
    .bind(entity_type.as_str())
    .bind(key)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a row and return its id
pub async fn create<'e, E>(executor: E, data: &CategoryMetadataCreate) -> RepoResult<i64>
where
    E: SqliteExecutor<'e>,
{
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO category_metadata (id, entity_type, category_key, category_label, display_order, is_active) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(data.entity_type.as_str())
    .bind(&data.category_key)
    .bind(&data.category_label)
    .bind(data.display_order)
    .bind(data.is_active)
    .execute(executor)
    .await?;
    Ok(id)
}

pub async fn update<'e, E>(executor: E, id: i64, key: &str, label: &str) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "UPDATE category_metadata SET category_key = ?1, category_label = ?2 WHERE id = ?3",
    )
    .bind(key)
    .bind(label)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(rows.rows_affected())
}

pub async fn delete<'e, E>(executor: E, id: i64) -> RepoResult<u64>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query("DELETE FROM category_metadata WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(rows.rows_affected())
}
