//! Repository for the `disposals` table.

use sqlx::{PgConnection, PgExecutor, PgPool};
use stockroom_core::pagination::Page;
use stockroom_core::types::DbId;
use uuid::Uuid;

use crate::filter::{BindValue, FilterBuilder};
use crate::models::disposal::{Disposal, DisposalFilter, NewDisposal};

const COLUMNS: &str = "d.id, d.disposal_uid, d.asset_master_id, m.management_number, \
    d.quantity, d.disposed_at, d.reason, d.processed_by, d.created_at, d.updated_at";

const FROM: &str = "disposals d JOIN asset_masters m ON m.id = d.asset_master_id";

pub struct DisposalRepo;

impl DisposalRepo {
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewDisposal,
    ) -> Result<Disposal, sqlx::Error> {
        let query = format!(
            "WITH d AS (
                INSERT INTO disposals
                    (disposal_uid, asset_master_id, quantity, disposed_at, reason, processed_by)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {COLUMNS} FROM d JOIN asset_masters m ON m.id = d.asset_master_id"
        );
        sqlx::query_as::<_, Disposal>(&query)
            .bind(input.disposal_uid)
            .bind(input.asset_master_id)
            .bind(input.quantity)
            .bind(input.disposed_at)
            .bind(&input.reason)
            .bind(&input.processed_by)
            .fetch_one(conn)
            .await
    }

    /// Most recently dated disposal of a master; ties go to the highest id.
    pub async fn find_latest_for_master(
        conn: &mut PgConnection,
        asset_master_id: DbId,
    ) -> Result<Option<Disposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE d.asset_master_id = $1 \
             ORDER BY d.disposed_at DESC, d.id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Disposal>(&query)
            .bind(asset_master_id)
            .fetch_optional(conn)
            .await
    }

    pub async fn find_by_uid<'e, E>(
        executor: E,
        disposal_uid: Uuid,
    ) -> Result<Option<Disposal>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE d.disposal_uid = $1");
        sqlx::query_as::<_, Disposal>(&query)
            .bind(disposal_uid)
            .fetch_optional(executor)
            .await
    }

    /// Delete one disposal. Returns the number of rows removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM disposals WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// List disposals ordered by `disposed_at`, then id.
    pub async fn list(
        pool: &PgPool,
        filter: &DisposalFilter,
        page: &Page,
    ) -> Result<Vec<Disposal>, sqlx::Error> {
        let builder = build_filter(filter);
        let next = builder.next_param();
        let order = page.order.as_sql();
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} {} \
             ORDER BY d.disposed_at {order}, d.id {order} \
             LIMIT ${next} OFFSET ${}",
            builder.where_clause(),
            next + 1
        );
        builder
            .bind_rows(sqlx::query_as::<_, Disposal>(&query))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &DisposalFilter) -> Result<i64, sqlx::Error> {
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
        let result = sqlx::query("DELETE FROM disposals WHERE asset_master_id = $1")
            .bind(asset_master_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

fn build_filter(filter: &DisposalFilter) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    if let Some(number) = filter.management_number.as_deref().filter(|n| !n.is_empty()) {
        builder.push("m.management_number = {}", BindValue::Text(number.to_string()));
    }
    if let Some(by) = filter.processed_by.as_deref().filter(|b| !b.trim().is_empty()) {
        builder.push("d.processed_by = {}", BindValue::Text(by.trim().to_string()));
    }
    if let Some(from) = filter.from {
        builder.push("d.disposed_at >= {}", BindValue::Timestamp(from));
    }
    if let Some(to) = filter.to {
        builder.push("d.disposed_at <= {}", BindValue::Timestamp(to));
    }
    builder
}
