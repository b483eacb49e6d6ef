//! Repository for the `lends` table.
//!
//! Outstanding quantity is never stored: every read attaches the sum of the
//! lend's returns as `returned`.

use sqlx::{PgConnection, PgExecutor, PgPool};
use stockroom_core::pagination::Page;
use stockroom_core::types::DbId;
use uuid::Uuid;

use crate::filter::{BindValue, FilterBuilder};
use crate::models::lend::{Lend, LendFilter, NewLend};

const RETURNED_SUM: &str =
    "COALESCE((SELECT SUM(r.quantity) FROM lend_returns r WHERE r.lend_id = l.id), 0)::BIGINT";

const FROM: &str = "lends l JOIN asset_masters m ON m.id = l.asset_master_id";

fn columns() -> String {
    format!(
        "l.id, l.lend_uid, l.asset_master_id, m.management_number, l.quantity, \
         {RETURNED_SUM} AS returned, l.borrower, l.due_on, l.lent_by, l.lent_at, l.note, \
         l.created_at, l.updated_at"
    )
}

pub struct LendRepo;

impl LendRepo {
    pub async fn insert(conn: &mut PgConnection, input: &NewLend) -> Result<Lend, sqlx::Error> {
        let query = format!(
            "WITH l AS (
                INSERT INTO lends
                    (lend_uid, asset_master_id, quantity, borrower, due_on, lent_by, lent_at, note)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
             )
             SELECT {} FROM l JOIN asset_masters m ON m.id = l.asset_master_id",
            columns()
        );
        sqlx::query_as::<_, Lend>(&query)
            .bind(input.lend_uid)
            .bind(input.asset_master_id)
            .bind(input.quantity)
            .bind(&input.borrower)
            .bind(input.due_on)
            .bind(&input.lent_by)
            .bind(input.lent_at)
            .bind(&input.note)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_uid<'e, E>(executor: E, lend_uid: Uuid) -> Result<Option<Lend>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {} FROM {FROM} WHERE l.lend_uid = $1", columns());
        sqlx::query_as::<_, Lend>(&query)
            .bind(lend_uid)
            .fetch_optional(executor)
            .await
    }

    /// Sum of all returns recorded against a lend.
    pub async fn returned_sum(conn: &mut PgConnection, lend_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM lend_returns WHERE lend_id = $1",
        )
        .bind(lend_id)
        .fetch_one(conn)
        .await
    }

    /// Number of lends of a master that still have units out.
    pub async fn count_outstanding_for_master(
        conn: &mut PgConnection,
        asset_master_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*)::BIGINT FROM lends l \
             WHERE l.asset_master_id = $1 AND l.quantity > {RETURNED_SUM}"
        );
        sqlx::query_scalar(&query)
            .bind(asset_master_id)
            .fetch_one(conn)
            .await
    }

    /// List lends ordered by `lent_at`, then id, in the page's direction.
    pub async fn list(
        pool: &PgPool,
        filter: &LendFilter,
        page: &Page,
    ) -> Result<Vec<Lend>, sqlx::Error> {
        let builder = build_filter(filter);
        let next = builder.next_param();
        let order = page.order.as_sql();
        let query = format!(
            "SELECT {} FROM {FROM} {} \
             ORDER BY l.lent_at {order}, l.id {order} \
             LIMIT ${next} OFFSET ${}",
            columns(),
            builder.where_clause(),
            next + 1
        );
        builder
            .bind_rows(sqlx::query_as::<_, Lend>(&query))
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, filter: &LendFilter) -> Result<i64, sqlx::Error> {
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
        let result = sqlx::query("DELETE FROM lends WHERE asset_master_id = $1")
            .bind(asset_master_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }
}

fn build_filter(filter: &LendFilter) -> FilterBuilder {
    let mut builder = FilterBuilder::new();
    if let Some(number) = filter.management_number.as_deref().filter(|n| !n.is_empty()) {
        builder.push("m.management_number = {}", BindValue::Text(number.to_string()));
    }
    if let Some(borrower) = filter.borrower.as_deref().filter(|b| !b.trim().is_empty()) {
        builder.push("l.borrower = {}", BindValue::Text(borrower.trim().to_string()));
    }
    if let Some(from) = filter.from {
        builder.push("l.lent_at >= {}", BindValue::Timestamp(from));
    }
    if let Some(to) = filter.to {
        builder.push("l.lent_at <= {}", BindValue::Timestamp(to));
    }
    if filter.only_outstanding {
        builder.push_raw(&format!("l.quantity > {RETURNED_SUM}"));
    }
    builder
}
