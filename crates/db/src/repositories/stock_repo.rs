//! Repository for the `stock_items` table.

use sqlx::{PgConnection, PgExecutor, PgPool};
use stockroom_core::pagination::Page;
use stockroom_core::stock::{LookupId, StockStatus};
use stockroom_core::types::{DbId, Quantity};

use crate::filter::{BindValue, FilterBuilder};
use crate::models::stock::{CreateStockItem, LockedStock, StockChanges, StockFilter, StockItem};

/// Stock columns qualified with `s`, plus the master's management number.
const COLUMNS: &str = "s.id, s.asset_master_id, m.management_number, s.serial, s.quantity, \
    s.status_id, s.purchased_on, s.owner, s.location, s.default_location, \
    s.last_checked_at, s.last_checked_by, s.notes, s.created_at, s.updated_at";

const FROM: &str = "stock_items s JOIN asset_masters m ON m.id = s.asset_master_id";

pub struct StockRepo;

impl StockRepo {
    /// Insert the stock row of a master with status Normal.
    pub async fn create(
        conn: &mut PgConnection,
        asset_master_id: DbId,
        input: &CreateStockItem,
    ) -> Result<StockItem, sqlx::Error> {
        let query = format!(
            "WITH s AS (
                INSERT INTO stock_items
                    (asset_master_id, serial, quantity, status_id, purchased_on,
                     owner, location, default_location, notes)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
             )
             SELECT {COLUMNS} FROM s JOIN asset_masters m ON m.id = s.asset_master_id"
        );
        sqlx::query_as::<_, StockItem>(&query)
            .bind(asset_master_id)
            .bind(&input.serial)
            .bind(input.quantity)
            .bind(StockStatus::Normal.id())
            .bind(input.purchased_on)
            .bind(input.owner.trim())
            .bind(input.location.as_deref().unwrap_or(input.default_location.trim()))
            .bind(input.default_location.trim())
            .bind(&input.notes)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_master_id<'e, E>(
        executor: E,
        asset_master_id: DbId,
    ) -> Result<Option<StockItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE s.asset_master_id = $1");
        sqlx::query_as::<_, StockItem>(&query)
            .bind(asset_master_id)
            .fetch_optional(executor)
            .await
    }

    /// Take an exclusive lock on the stock row of a master.
    ///
    /// Blocks until any other transaction holding the lock finishes. Only the
    /// stock row is locked; the joined master row is read without a lock.
    pub async fn lock_for_master(
        conn: &mut PgConnection,
        asset_master_id: DbId,
    ) -> Result<Option<LockedStock>, sqlx::Error> {
        sqlx::query_as::<_, LockedStock>(
            "SELECT s.id, s.asset_master_id, s.quantity, s.status_id,
                    m.management_category_id, s.default_location
             FROM stock_items s
             JOIN asset_masters m ON m.id = s.asset_master_id
             WHERE s.asset_master_id = $1
             FOR UPDATE OF s",
        )
        .bind(asset_master_id)
        .fetch_optional(conn)
        .await
    }

    /// `quantity = quantity + delta`. Returns the number of rows affected.
    pub async fn adjust_quantity(
        conn: &mut PgConnection,
        id: DbId,
        delta: Quantity,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE stock_items SET quantity = quantity + $2 WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: DbId,
        status_id: LookupId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE stock_items SET status_id = $2 WHERE id = $1")
            .bind(id)
            .bind(status_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn set_location(
        conn: &mut PgConnection,
        id: DbId,
        location: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE stock_items SET location = $2 WHERE id = $1")
            .bind(id)
            .bind(location)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Apply editor changes. Only non-`None` fields are written.
    pub async fn update(
        conn: &mut PgConnection,
        id: DbId,
        changes: &StockChanges,
    ) -> Result<Option<StockItem>, sqlx::Error> {
        let query = format!(
            "WITH s AS (
                UPDATE stock_items SET
                    serial = COALESCE($2, serial),
                    quantity = COALESCE($3, quantity),
                    status_id = COALESCE($4, status_id),
                    purchased_on = COALESCE($5, purchased_on),
                    owner = COALESCE($6, owner),
                    location = COALESCE($7, location),
                    default_location = COALESCE($8, default_location),
                    last_checked_at = COALESCE($9, last_checked_at),
                    last_checked_by = COALESCE($10, last_checked_by),
                    notes = COALESCE($11, notes)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM s JOIN asset_masters m ON m.id = s.asset_master_id"
        );
        sqlx::query_as::<_, StockItem>(&query)
            .bind(id)
            .bind(&changes.serial)
            .bind(changes.quantity)
            .bind(changes.status_id)
            .bind(changes.purchased_on)
            .bind(&changes.owner)
            .bind(&changes.location)
            .bind(&changes.default_location)
            .bind(changes.last_checked_at)
            .bind(&changes.last_checked_by)
            .bind(&changes.notes)
            .fetch_optional(conn)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        filter: &StockFilter,
        page: &Page,
    ) -> Result<Vec<StockItem>, sqlx::Error> {
        let builder = build_filter(filter);
        let next = builder.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} \
             ORDER BY s.id {} \
             LIMIT ${next} OFFSET ${}",
            builder.where_clause(),
            page.order.as_sql(),
            next + 1
        );
        builder
            .bind_rows(sqlx::query_as::<_, StockItem>(&query))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &StockFilter) -> Result<i64, sqlx::Error> {
        let builder = build_filter(filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM {FROM} {}",
            builder.where_clause()
        );
        builder
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    pub async fn delete_for_master(
        conn: &mut PgConnection,
        asset_master_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stock_items WHERE asset_master_id = $1")
            .bind(asset_master_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

fn build_filter(filter: &StockFilter) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    if let Some(status_id) = filter.status_id {
        builder.push("s.status_id = {}", BindValue::SmallInt(status_id));
    }
    if let Some(owner) = filter.owner.as_deref().filter(|o| !o.trim().is_empty()) {
        builder.push("s.owner = {}", BindValue::Text(owner.trim().to_string()));
    }
    if let Some(location) = filter.location.as_deref().filter(|l| !l.trim().is_empty()) {
        builder.push_search(&["s.location", "s.default_location"], location.trim());
    }
    builder
}
