//! Lends and returns.
//!
//! A lend decrements the stock row and records who holds the units; returns
//! add them back. Outstanding quantity is always `quantity - Σreturns`,
//! recomputed under the stock row lock whenever it gates a mutation.

use serde::Serialize;
use stockroom_core::error::CoreError;
use stockroom_core::lending::{check_lend, LendProgress, LendState};
use stockroom_core::pagination::{Page, Paged};
use stockroom_core::stock::{ManagementCategory, Movement};
use stockroom_core::types::Quantity;
use stockroom_core::validation::{normalize_optional, require_positive, require_text};
use stockroom_db::error::classify;
use stockroom_db::models::lend::{
    CreateLend, CreateLendReturn, Lend, LendFilter, LendReturn, NewLend, NewLendReturn,
};
use stockroom_db::repositories::{LendRepo, ReturnRepo, StockRepo};
use uuid::Uuid;

use crate::catalog::resolve_master;
use crate::context::LedgerContext;
use crate::stock::StockLedger;

/// A lend with its derived outstanding quantity and lifecycle stage.
#[derive(Debug, Clone, Serialize)]
pub struct LendView {
    #[serde(flatten)]
    pub lend: Lend,
    pub outstanding: Quantity,
    pub state: LendState,
}

impl From<Lend> for LendView {
    fn from(lend: Lend) -> Self {
        let progress = lend.progress();
        Self {
            outstanding: progress.outstanding(),
            state: progress.state(),
            lend,
        }
    }
}

/// A recorded return plus the lend's position after it.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnReceipt {
    #[serde(flatten)]
    pub record: LendReturn,
    pub lend_uid: Uuid,
    pub outstanding: Quantity,
    pub state: LendState,
}

#[derive(Clone)]
pub struct LendingEngine {
    ctx: LedgerContext,
}

impl LendingEngine {
    pub fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Lend `quantity` units of a master to `borrower`.
    pub async fn create_lend(
        &self,
        management_number: &str,
        input: CreateLend,
    ) -> Result<LendView, CoreError> {
        self.ctx
            .bounded("create_lend", self.create_lend_tx(management_number, input))
            .await
    }

    async fn create_lend_tx(
        &self,
        management_number: &str,
        input: CreateLend,
    ) -> Result<LendView, CoreError> {
        require_positive("quantity", input.quantity)?;
        require_text("borrower", &input.borrower)?;
        let borrower = input.borrower.trim().to_string();

        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let master = resolve_master(&mut *tx, management_number).await?;
        let locked = StockLedger::lock_stock_row(&mut *tx, master.id).await?;

        if let Err(err) = check_lend(locked.quantity(), input.quantity) {
            tracing::warn!(
                management_number,
                requested = input.quantity,
                available = locked.quantity(),
                "Lend rejected",
            );
            return Err(err);
        }
        let outcome =
            StockLedger::apply_movement(&mut *tx, &locked, Movement::Lend, -input.quantity).await?;
        if locked.category == ManagementCategory::Individual {
            StockRepo::set_location(&mut *tx, locked.id(), &borrower)
                .await
                .map_err(classify)?;
        }

        let now = self.ctx.clock.now();
        let lend = LendRepo::insert(
            &mut *tx,
            &NewLend {
                lend_uid: self.ctx.ids.next_id(now),
                asset_master_id: master.id,
                quantity: input.quantity,
                borrower,
                due_on: input.due_on,
                lent_by: normalize_optional(input.lent_by.as_deref()),
                lent_at: now,
                note: normalize_optional(input.note.as_deref()),
            },
        )
        .await
        .map_err(classify)?;
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            lend_uid = %lend.lend_uid,
            management_number,
            quantity = lend.quantity,
            stock_after = outcome.quantity,
            "Lend created",
        );
        Ok(LendView::from(lend))
    }

    pub async fn get_lend(&self, lend_uid: Uuid) -> Result<LendView, CoreError> {
        self.ctx
            .bounded("get_lend", async {
                LendRepo::find_by_uid(&self.ctx.pool, lend_uid)
                    .await
                    .map_err(classify)?
                    .map(LendView::from)
                    .ok_or_else(|| CoreError::not_found("Lend", lend_uid))
            })
            .await
    }

    /// List lends ordered by lend time, then id.
    pub async fn list_lends(
        &self,
        filter: LendFilter,
        page: Page,
    ) -> Result<Paged<LendView>, CoreError> {
        self.ctx
            .bounded("list_lends", async {
                let items = LendRepo::list(&self.ctx.pool, &filter, &page)
                    .await
                    .map_err(classify)?;
                let total = LendRepo::count(&self.ctx.pool, &filter)
                    .await
                    .map_err(classify)?;
                Ok(Paged::new(items, total, &page).map(LendView::from))
            })
            .await
    }

    /// Return `quantity` units of a lend.
    ///
    /// The returned sum is read after the stock row lock is taken, so two
    /// concurrent returns against one lend cannot both pass the
    /// outstanding check.
    pub async fn create_return(
        &self,
        lend_uid: Uuid,
        input: CreateLendReturn,
    ) -> Result<ReturnReceipt, CoreError> {
        self.ctx
            .bounded("create_return", self.create_return_tx(lend_uid, input))
            .await
    }

    async fn create_return_tx(
        &self,
        lend_uid: Uuid,
        input: CreateLendReturn,
    ) -> Result<ReturnReceipt, CoreError> {
        require_positive("quantity", input.quantity)?;

        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let lend = LendRepo::find_by_uid(&mut *tx, lend_uid)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::not_found("Lend", lend_uid))?;
        let locked = StockLedger::lock_stock_row(&mut *tx, lend.asset_master_id).await?;

        let returned = LendRepo::returned_sum(&mut *tx, lend.id)
            .await
            .map_err(classify)?;
        let progress = match LendProgress::new(lend.quantity, returned).check_return(input.quantity)
        {
            Ok(progress) => progress,
            Err(err) => {
                tracing::warn!(
                    lend_uid = %lend_uid,
                    requested = input.quantity,
                    outstanding = LendProgress::new(lend.quantity, returned).outstanding(),
                    "Return rejected",
                );
                return Err(err);
            }
        };

        let outcome =
            StockLedger::apply_movement(&mut *tx, &locked, Movement::Return, input.quantity)
                .await?;
        if locked.category == ManagementCategory::Individual && outcome.quantity > 0 {
            StockRepo::set_location(&mut *tx, locked.id(), &locked.row.default_location)
                .await
                .map_err(classify)?;
        }

        let now = self.ctx.clock.now();
        let record = ReturnRepo::insert(
            &mut *tx,
            &NewLendReturn {
                return_uid: self.ctx.ids.next_id(now),
                lend_id: lend.id,
                quantity: input.quantity,
                processed_by: normalize_optional(input.processed_by.as_deref()),
                returned_at: now,
                note: normalize_optional(input.note.as_deref()),
            },
        )
        .await
        .map_err(classify)?;
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            return_uid = %record.return_uid,
            lend_uid = %lend_uid,
            quantity = record.quantity,
            outstanding = progress.outstanding(),
            stock_after = outcome.quantity,
            "Return recorded",
        );
        Ok(ReturnReceipt {
            record,
            lend_uid,
            outstanding: progress.outstanding(),
            state: progress.state(),
        })
    }

    pub async fn list_returns_by_lend(
        &self,
        lend_uid: Uuid,
        page: Page,
    ) -> Result<Paged<LendReturn>, CoreError> {
        self.ctx
            .bounded("list_returns", async {
                let lend = LendRepo::find_by_uid(&self.ctx.pool, lend_uid)
                    .await
                    .map_err(classify)?
                    .ok_or_else(|| CoreError::not_found("Lend", lend_uid))?;
                let items = ReturnRepo::list_by_lend(&self.ctx.pool, lend.id, &page)
                    .await
                    .map_err(classify)?;
                let total = ReturnRepo::count_by_lend(&self.ctx.pool, lend.id)
                    .await
                    .map_err(classify)?;
                Ok(Paged::new(items, total, &page))
            })
            .await
    }
}
