//! Disposals and their reversal.

use stockroom_core::error::CoreError;
use stockroom_core::pagination::{Page, Paged};
use stockroom_core::stock::{ManagementCategory, Movement};
use stockroom_core::validation::{normalize_optional, require_positive};
use stockroom_db::error::classify;
use stockroom_db::models::disposal::{CreateDisposal, Disposal, DisposalFilter, NewDisposal};
use stockroom_db::repositories::DisposalRepo;
use uuid::Uuid;

use crate::catalog::resolve_master;
use crate::context::LedgerContext;
use crate::stock::StockLedger;

pub const INSUFFICIENT_FOR_DISPOSAL: &str = "insufficient stock for disposal";

#[derive(Clone)]
pub struct DisposalEngine {
    ctx: LedgerContext,
}

impl DisposalEngine {
    pub fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Permanently remove `quantity` units from stock. A row emptied this
    /// way becomes Disposed.
    pub async fn create_disposal(
        &self,
        management_number: &str,
        input: CreateDisposal,
    ) -> Result<Disposal, CoreError> {
        self.ctx
            .bounded(
                "create_disposal",
                self.create_disposal_tx(management_number, input),
            )
            .await
    }

    async fn create_disposal_tx(
        &self,
        management_number: &str,
        input: CreateDisposal,
    ) -> Result<Disposal, CoreError> {
        require_positive("quantity", input.quantity)?;

        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let master = resolve_master(&mut *tx, management_number).await?;
        let locked = StockLedger::lock_stock_row(&mut *tx, master.id).await?;

        if locked.category == ManagementCategory::Individual && input.quantity != 1 {
            return Err(CoreError::Validation(
                "individually managed items are disposed one unit at a time".to_string(),
            ));
        }
        if input.quantity > locked.quantity() {
            tracing::warn!(
                management_number,
                requested = input.quantity,
                available = locked.quantity(),
                "Disposal rejected",
            );
            return Err(CoreError::Conflict(INSUFFICIENT_FOR_DISPOSAL.to_string()));
        }

        let outcome =
            StockLedger::apply_movement(&mut *tx, &locked, Movement::Dispose, -input.quantity)
                .await?;
        let now = self.ctx.clock.now();
        let disposal = DisposalRepo::insert(
            &mut *tx,
            &NewDisposal {
                disposal_uid: self.ctx.ids.next_id(now),
                asset_master_id: master.id,
                quantity: input.quantity,
                disposed_at: now,
                reason: normalize_optional(input.reason.as_deref()),
                processed_by: normalize_optional(input.processed_by.as_deref()),
            },
        )
        .await
        .map_err(classify)?;
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            disposal_uid = %disposal.disposal_uid,
            management_number,
            quantity = disposal.quantity,
            stock_after = outcome.quantity,
            status = outcome.status.name(),
            "Disposal recorded",
        );
        Ok(disposal)
    }

    /// Reverse the latest disposal of a master and return the removed record.
    ///
    /// "Latest" is the greatest `disposed_at`, ties broken by the highest id,
    /// chosen after the stock row lock is held.
    pub async fn undo_disposal(&self, management_number: &str) -> Result<Disposal, CoreError> {
        self.ctx
            .bounded("undo_disposal", self.undo_disposal_tx(management_number))
            .await
    }

    async fn undo_disposal_tx(&self, management_number: &str) -> Result<Disposal, CoreError> {
        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let master = resolve_master(&mut *tx, management_number).await?;
        let locked = StockLedger::lock_stock_row(&mut *tx, master.id).await?;

        let disposal = DisposalRepo::find_latest_for_master(&mut *tx, master.id)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::not_found("Disposal for asset", management_number))?;
        let removed = DisposalRepo::delete(&mut *tx, disposal.id)
            .await
            .map_err(classify)?;
        if removed != 1 {
            return Err(CoreError::Internal(format!(
                "undo removed {removed} disposal rows for id {}",
                disposal.id
            )));
        }

        let outcome = StockLedger::apply_movement(
            &mut *tx,
            &locked,
            Movement::UndoDispose,
            disposal.quantity,
        )
        .await?;
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            disposal_uid = %disposal.disposal_uid,
            management_number,
            quantity = disposal.quantity,
            stock_after = outcome.quantity,
            status = outcome.status.name(),
            "Disposal undone",
        );
        Ok(disposal)
    }

    pub async fn list_disposals(
        &self,
        filter: DisposalFilter,
        page: Page,
    ) -> Result<Paged<Disposal>, CoreError> {
        self.ctx
            .bounded("list_disposals", async {
                let items = DisposalRepo::list(&self.ctx.pool, &filter, &page)
                    .await
                    .map_err(classify)?;
                let total = DisposalRepo::count(&self.ctx.pool, &filter)
                    .await
                    .map_err(classify)?;
                Ok(Paged::new(items, total, &page))
            })
            .await
    }

    pub async fn get_disposal(&self, disposal_uid: Uuid) -> Result<Disposal, CoreError> {
        self.ctx
            .bounded("get_disposal", async {
                DisposalRepo::find_by_uid(&self.ctx.pool, disposal_uid)
                    .await
                    .map_err(classify)?
                    .ok_or_else(|| CoreError::not_found("Disposal", disposal_uid))
            })
            .await
    }
}
