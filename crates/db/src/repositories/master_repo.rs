//! Repository for the `asset_masters` table.

use sqlx::{PgConnection, PgExecutor, PgPool};
use stockroom_core::pagination::Page;
use stockroom_core::types::DbId;

use crate::filter::{BindValue, FilterBuilder};
use crate::models::master::{AssetMaster, CreateAssetMaster, MasterFilter, UpdateAssetMaster};
use crate::models::summary::{GenreCount, InventorySummary, StatusCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, management_number, name, management_category_id, genre_id, \
    manufacturer, model, created_at, updated_at";

pub struct MasterRepo;

impl MasterRepo {
    /// Insert a master under a temporary management number.
    ///
    /// Both ids must already be present in `input`; the caller validates.
    pub async fn insert_reserved(
        conn: &mut PgConnection,
        placeholder: &str,
        input: &CreateAssetMaster,
    ) -> Result<AssetMaster, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_masters
                (management_number, name, management_category_id, genre_id, manufacturer, model)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetMaster>(&query)
            .bind(placeholder)
            .bind(input.name.trim())
            .bind(input.management_category_id)
            .bind(input.genre_id)
            .bind(input.manufacturer.trim())
            .bind(&input.model)
            .fetch_one(conn)
            .await
    }

    /// Replace the placeholder with the final management number.
    ///
    /// Only rows still carrying `placeholder` are touched, so a finalized
    /// number is never rewritten.
    pub async fn finalize_number(
        conn: &mut PgConnection,
        id: DbId,
        placeholder: &str,
        management_number: &str,
    ) -> Result<Option<AssetMaster>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_masters SET management_number = $3
             WHERE id = $1 AND management_number = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetMaster>(&query)
            .bind(id)
            .bind(placeholder)
            .bind(management_number)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_management_number<'e, E>(
        executor: E,
        management_number: &str,
    ) -> Result<Option<AssetMaster>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM asset_masters WHERE management_number = $1");
        sqlx::query_as::<_, AssetMaster>(&query)
            .bind(management_number)
            .fetch_optional(executor)
            .await
    }

    /// Lock the master row for the deletion cascade.
    pub async fn lock_by_management_number(
        conn: &mut PgConnection,
        management_number: &str,
    ) -> Result<Option<AssetMaster>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM asset_masters WHERE management_number = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, AssetMaster>(&query)
            .bind(management_number)
            .fetch_optional(conn)
            .await
    }

    /// List masters matching `filter`, ordered by id.
    pub async fn list(
        pool: &PgPool,
        filter: &MasterFilter,
        page: &Page,
    ) -> Result<Vec<AssetMaster>, sqlx::Error> {
        let builder = build_filter(filter);
        let next = builder.next_param();
        let query = format!(
            "SELECT {COLUMNS} FROM asset_masters m {} \
             ORDER BY m.id {} \
             LIMIT ${next} OFFSET ${}",
            builder.where_clause(),
            page.order.as_sql(),
            next + 1
        );
        builder
            .bind_rows(sqlx::query_as::<_, AssetMaster>(&query))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &MasterFilter) -> Result<i64, sqlx::Error> {
        let builder = build_filter(filter);
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM asset_masters m {}",
            builder.where_clause()
        );
        builder
            .bind_count(sqlx::query_scalar::<_, i64>(&query))
            .fetch_one(pool)
            .await
    }

    /// Update descriptive fields. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no master has this management number.
    pub async fn update(
        pool: &PgPool,
        management_number: &str,
        input: &UpdateAssetMaster,
    ) -> Result<Option<AssetMaster>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_masters SET
                name = COALESCE($2, name),
                manufacturer = COALESCE($3, manufacturer),
                model = COALESCE($4, model)
             WHERE management_number = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetMaster>(&query)
            .bind(management_number)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.manufacturer.as_deref().map(str::trim))
            .bind(&input.model)
            .fetch_optional(pool)
            .await
    }

    /// Delete a master row. Dependents must already be gone.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM asset_masters WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Catalog-wide counts: masters, stock rows per status, masters per genre.
    pub async fn summary(pool: &PgPool) -> Result<InventorySummary, sqlx::Error> {
        let total_masters: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM asset_masters")
            .fetch_one(pool)
            .await?;

        let by_status = sqlx::query_as::<_, StatusCount>(
            "SELECT s.id AS status_id, s.name, COUNT(i.id)::BIGINT AS count
             FROM stock_statuses s
             LEFT JOIN stock_items i ON i.status_id = s.id
             GROUP BY s.id, s.name
             ORDER BY s.id",
        )
        .fetch_all(pool)
        .await?;

        let by_genre = sqlx::query_as::<_, GenreCount>(
            "SELECT g.id AS genre_id, g.name, COUNT(m.id)::BIGINT AS count
             FROM genres g
             LEFT JOIN asset_masters m ON m.genre_id = g.id
             GROUP BY g.id, g.name
             ORDER BY g.id",
        )
        .fetch_all(pool)
        .await?;

        Ok(InventorySummary {
            total_masters,
            by_status,
            by_genre,
        })
    }
}

fn build_filter(filter: &MasterFilter) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        builder.push_search(&["m.name", "m.management_number"], q);
    }
    if let Some(genre_id) = filter.genre_id {
        builder.push("m.genre_id = {}", BindValue::SmallInt(genre_id));
    }
    if let Some(category_id) = filter.management_category_id {
        builder.push(
            "m.management_category_id = {}",
            BindValue::SmallInt(category_id),
        );
    }
    builder
}
