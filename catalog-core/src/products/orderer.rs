//! Manual display ranking
//!
//! Moves are pure swaps of two effective sort keys. Nothing renumbers the
//! rest of the scope, so keys may drift into duplicates over many moves;
//! ties fall back to name order when listing.

use crate::backend::{CatalogBackend, WriteBatch, WriteOp};
use crate::taxonomy::{TaxonomyError, TaxonomyResult};
use serde::{Deserialize, Serialize};
use shared::models::CatalogItem;

/// Spacing of the synthetic keys given to unranked items
const SYNTHETIC_KEY_STEP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

/// Result of [`ProductOrderer::move_adjacent`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Already at the edge in that direction; nothing written
    Unchanged,
    /// `(item id, new sort key)` of both items
    Swapped {
        moved: (i64, i32),
        displaced: (i64, i32),
    },
}

pub struct ProductOrderer<'a, B: CatalogBackend + ?Sized> {
    backend: &'a B,
}

impl<'a, B: CatalogBackend + ?Sized> ProductOrderer<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Swap the item at `index` with its neighbour in `direction`.
    ///
    /// `items` must be the scope in its current display order.
    pub async fn move_adjacent(
        &self,
        items: &[CatalogItem],
        index: usize,
        direction: Direction,
    ) -> TaxonomyResult<MoveOutcome> {
        if index >= items.len() {
            return Err(TaxonomyError::Validation(format!(
                "index {index} is outside a list of {} items",
                items.len()
            )));
        }
        let target = match direction {
            Direction::Up if index == 0 => return Ok(MoveOutcome::Unchanged),
            Direction::Down if index + 1 == items.len() => return Ok(MoveOutcome::Unchanged),
            Direction::Up => index - 1,
            Direction::Down => index + 1,
        };

        let moved = &items[index];
        let displaced = &items[target];
        let moved_key = effective_key(displaced, target);
        let displaced_key = effective_key(moved, index);

        let batch = WriteBatch::new()
            .with(WriteOp::SetItemSortOrder {
                id: moved.id,
                sort_order: moved_key,
            })
            .with(WriteOp::SetItemSortOrder {
                id: displaced.id,
                sort_order: displaced_key,
            });
        self.backend
            .apply(batch)
            .await
            .map_err(|e| TaxonomyError::write("move product", e))?;

        tracing::info!(
            item = moved.id,
            sort_order = moved_key,
            swapped_with = displaced.id,
            "Product moved"
        );
        Ok(MoveOutcome::Swapped {
            moved: (moved.id, moved_key),
            displaced: (displaced.id, displaced_key),
        })
    }

    /// Overwrite one item's sort key; no uniqueness or bounds checks
    pub async fn set_order(&self, item_id: i64, value: i32) -> TaxonomyResult<()> {
        let rows = self
            .backend
            .apply(WriteBatch::new().with(WriteOp::SetItemSortOrder {
                id: item_id,
                sort_order: value,
            }))
            .await
            .map_err(|e| TaxonomyError::write("set product order", e))?;

        if rows.first().copied().unwrap_or(0) == 0 {
            return Err(TaxonomyError::ItemNotFound { id: item_id });
        }
        tracing::info!(item = item_id, sort_order = value, "Product order set");
        Ok(())
    }
}

/// Persisted key, or `(1-based display position) * 10` for unranked items
fn effective_key(item: &CatalogItem, position: usize) -> i32 {
    item.sort_order.unwrap_or_else(|| {
        i32::try_from(position + 1)
            .unwrap_or(i32::MAX / SYNTHETIC_KEY_STEP)
            .saturating_mul(SYNTHETIC_KEY_STEP)
    })
}
