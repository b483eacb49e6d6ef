//! Repository for the `lend_returns` table.

use sqlx::{PgConnection, PgPool};
use stockroom_core::pagination::Page;
use stockroom_core::types::DbId;

use crate::models::lend::{LendReturn, NewLendReturn};

const COLUMNS: &str = "id, return_uid, lend_id, quantity, processed_by, returned_at, note, \
    created_at, updated_at";

pub struct ReturnRepo;

impl ReturnRepo {
    pub async fn insert(
        conn: &mut PgConnection,
        input: &NewLendReturn,
    ) -> Result<LendReturn, sqlx::Error> {
        let query = format!(
            "INSERT INTO lend_returns
                (return_uid, lend_id, quantity, processed_by, returned_at, note)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LendReturn>(&query)
            .bind(input.return_uid)
            .bind(input.lend_id)
            .bind(input.quantity)
            .bind(&input.processed_by)
            .bind(input.returned_at)
            .bind(&input.note)
            .fetch_one(conn)
            .await
    }

    /// Returns of one lend, ordered by `returned_at` then id.
    pub async fn list_by_lend(
        pool: &PgPool,
        lend_id: DbId,
        page: &Page,
    ) -> Result<Vec<LendReturn>, sqlx::Error> {
        let order = page.order.as_sql();
        let query = format!(
            "SELECT {COLUMNS} FROM lend_returns WHERE lend_id = $1 \
             ORDER BY returned_at {order}, id {order} \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, LendReturn>(&query)
            .bind(lend_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_lend(pool: &PgPool, lend_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM lend_returns WHERE lend_id = $1")
            .bind(lend_id)
            .fetch_one(pool)
            .await
    }

    /// Delete every return recorded against any lend of a master.
    pub async fn delete_for_master(
        conn: &mut PgConnection,
        asset_master_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM lend_returns r USING lends l \
             WHERE r.lend_id = l.id AND l.asset_master_id = $1",
        )
        .bind(asset_master_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
