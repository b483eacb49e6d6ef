//! Stock row primitives and the stock editor.
//!
//! The associated functions ([`StockLedger::lock_stock_row`],
//! [`StockLedger::adjust_quantity`], [`StockLedger::set_status`],
//! [`StockLedger::apply_movement`]) operate on the caller's open transaction
//! and are the only way the other engines touch quantities. Callers must
//! check the resulting quantity against the locked row before adjusting.

use sqlx::PgConnection;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::{Page, Paged};
use stockroom_core::stock::{
    checked_apply, status_after, toggle_broken, ManagementCategory, Movement, StockStatus,
};
use stockroom_core::types::{DbId, Quantity};
use stockroom_core::validation::{normalize_optional, reject_blank, require_non_negative, require_text};
use stockroom_db::error::classify;
use stockroom_db::models::stock::{
    CreateStockItem, LockedStock, StockChanges, StockFilter, StockItem, UpdateStockItem,
};
use stockroom_db::repositories::{LendRepo, StockRepo};

use crate::catalog::resolve_master;
use crate::context::LedgerContext;

pub const ITEM_STILL_LENT: &str = "individual item has an outstanding lend";

/// Quantity and status of a stock row after a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockOutcome {
    pub quantity: Quantity,
    pub status: StockStatus,
}

/// Decoded view of a locked row.
#[derive(Debug, Clone)]
pub struct LockedRow {
    pub row: LockedStock,
    pub category: ManagementCategory,
    pub status: StockStatus,
}

impl LockedRow {
    pub fn quantity(&self) -> Quantity {
        self.row.quantity
    }

    pub fn id(&self) -> DbId {
        self.row.id
    }
}

#[derive(Clone)]
pub struct StockLedger {
    ctx: LedgerContext,
}

impl StockLedger {
    pub fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Lock the stock row of a master for the rest of the transaction.
    pub async fn lock_stock_row(
        conn: &mut PgConnection,
        asset_master_id: DbId,
    ) -> Result<LockedRow, CoreError> {
        let row = StockRepo::lock_for_master(conn, asset_master_id)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::not_found("Stock row for master", asset_master_id))?;
        let category = ManagementCategory::from_id(row.management_category_id)
            .map_err(|e| CoreError::Internal(e.message()))?;
        let status =
            StockStatus::from_id(row.status_id).map_err(|e| CoreError::Internal(e.message()))?;
        Ok(LockedRow {
            row,
            category,
            status,
        })
    }

    /// `quantity += delta` on exactly one row.
    pub async fn adjust_quantity(
        conn: &mut PgConnection,
        row_id: DbId,
        delta: Quantity,
    ) -> Result<(), CoreError> {
        let affected = StockRepo::adjust_quantity(conn, row_id, delta)
            .await
            .map_err(classify)?;
        expect_one_row(affected, "adjust quantity", row_id)
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        row_id: DbId,
        status: StockStatus,
    ) -> Result<(), CoreError> {
        let affected = StockRepo::set_status(conn, row_id, status.id())
            .await
            .map_err(classify)?;
        expect_one_row(affected, "set status", row_id)
    }

    /// Apply `delta` to a locked row and move its status accordingly.
    ///
    /// The business check (insufficient stock, over-return) happens in the
    /// caller; this only guards the row invariants: non-negative, and at most
    /// one unit for individually managed items.
    pub async fn apply_movement(
        conn: &mut PgConnection,
        locked: &LockedRow,
        movement: Movement,
        delta: Quantity,
    ) -> Result<StockOutcome, CoreError> {
        let quantity = checked_apply(locked.quantity(), delta, locked.category).ok_or_else(|| {
            CoreError::Conflict(format!(
                "stock of {} cannot change by {delta}",
                locked.quantity()
            ))
        })?;
        Self::adjust_quantity(conn, locked.id(), delta).await?;

        let mut status = locked.status;
        if let Some(next) = status_after(locked.status, movement, quantity, locked.category) {
            Self::set_status(conn, locked.id(), next).await?;
            status = next;
        }
        Ok(StockOutcome { quantity, status })
    }

    /// Register the stock row of a master.
    pub async fn register_stock(
        &self,
        management_number: &str,
        input: CreateStockItem,
    ) -> Result<StockItem, CoreError> {
        self.ctx
            .bounded("register_stock", self.register_stock_tx(management_number, input))
            .await
    }

    async fn register_stock_tx(
        &self,
        management_number: &str,
        mut input: CreateStockItem,
    ) -> Result<StockItem, CoreError> {
        require_text("owner", &input.owner)?;
        require_text("default_location", &input.default_location)?;
        require_non_negative("quantity", input.quantity)?;
        input.serial = normalize_optional(input.serial.as_deref());
        input.location = normalize_optional(input.location.as_deref());
        input.notes = normalize_optional(input.notes.as_deref());

        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let master = resolve_master(&mut *tx, management_number).await?;
        let category = ManagementCategory::from_id(master.management_category_id)
            .map_err(|e| CoreError::Internal(e.message()))?;
        check_capacity(category, input.quantity)?;

        let item = StockRepo::create(&mut *tx, master.id, &input)
            .await
            .map_err(classify)?;
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            stock_id = item.id,
            management_number = %item.management_number,
            quantity = item.quantity,
            "Stock row registered",
        );
        Ok(item)
    }

    pub async fn get_stock(&self, management_number: &str) -> Result<StockItem, CoreError> {
        self.ctx
            .bounded("get_stock", async {
                let master = resolve_master(&self.ctx.pool, management_number).await?;
                StockRepo::find_by_master_id(&self.ctx.pool, master.id)
                    .await
                    .map_err(classify)?
                    .ok_or_else(|| CoreError::not_found("Stock row", management_number))
            })
            .await
    }

    pub async fn list_stock(
        &self,
        filter: StockFilter,
        page: Page,
    ) -> Result<Paged<StockItem>, CoreError> {
        self.ctx
            .bounded("list_stock", async {
                let items = StockRepo::list(&self.ctx.pool, &filter, &page)
                    .await
                    .map_err(classify)?;
                let total = StockRepo::count(&self.ctx.pool, &filter)
                    .await
                    .map_err(classify)?;
                Ok(Paged::new(items, total, &page))
            })
            .await
    }

    /// Edit a stock row under its lock.
    ///
    /// `quantity` is absolute. `broken` toggles between Normal and Broken and
    /// is refused on disposed rows. Setting `last_checked_by` stamps the
    /// check time from the ledger clock.
    pub async fn edit_stock(
        &self,
        management_number: &str,
        patch: UpdateStockItem,
    ) -> Result<StockItem, CoreError> {
        self.ctx
            .bounded("edit_stock", self.edit_stock_tx(management_number, patch))
            .await
    }

    async fn edit_stock_tx(
        &self,
        management_number: &str,
        patch: UpdateStockItem,
    ) -> Result<StockItem, CoreError> {
        reject_blank("owner", patch.owner.as_deref())?;
        reject_blank("default_location", patch.default_location.as_deref())?;
        if let Some(quantity) = patch.quantity {
            require_non_negative("quantity", quantity)?;
        }

        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let master = resolve_master(&mut *tx, management_number).await?;
        let locked = Self::lock_stock_row(&mut *tx, master.id).await?;

        let mut status = locked.status;
        if let Some(broken) = patch.broken {
            if let Some(next) = toggle_broken(status, broken)? {
                status = next;
            }
        }
        if let Some(quantity) = patch.quantity {
            check_capacity(locked.category, quantity)?;
            if quantity > 0 && locked.category == ManagementCategory::Individual {
                let outstanding = LendRepo::count_outstanding_for_master(&mut *tx, master.id)
                    .await
                    .map_err(classify)?;
                if outstanding > 0 {
                    tracing::warn!(
                        management_number,
                        outstanding,
                        "Refusing to restock an individual item that is still lent out",
                    );
                    return Err(CoreError::Conflict(ITEM_STILL_LENT.to_string()));
                }
            }
            if let Some(next) = status_after(status, Movement::Edit, quantity, locked.category) {
                status = next;
            }
        }

        let checked_by = normalize_optional(patch.last_checked_by.as_deref());
        let changes = StockChanges {
            serial: normalize_optional(patch.serial.as_deref()),
            quantity: patch.quantity,
            status_id: (status != locked.status).then_some(status.id()),
            purchased_on: patch.purchased_on,
            owner: patch.owner.as_deref().map(|s| s.trim().to_string()),
            location: normalize_optional(patch.location.as_deref()),
            default_location: patch.default_location.as_deref().map(|s| s.trim().to_string()),
            last_checked_at: checked_by.as_ref().map(|_| self.ctx.clock.now()),
            last_checked_by: checked_by,
            notes: normalize_optional(patch.notes.as_deref()),
        };

        let item = StockRepo::update(&mut *tx, locked.id(), &changes)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::Internal(format!("locked stock row {} vanished", locked.id())))?;
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            stock_id = item.id,
            management_number = %item.management_number,
            quantity = item.quantity,
            status_id = item.status_id,
            "Stock row edited",
        );
        Ok(item)
    }
}

fn check_capacity(category: ManagementCategory, quantity: Quantity) -> Result<(), CoreError> {
    match category.max_quantity() {
        Some(max) if quantity > max => Err(CoreError::Validation(format!(
            "quantity of an individually managed item must be at most {max}"
        ))),
        _ => Ok(()),
    }
}

fn expect_one_row(affected: u64, action: &str, row_id: DbId) -> Result<(), CoreError> {
    if affected != 1 {
        tracing::error!(row_id, affected, action, "Stock row update hit an unexpected row count");
        return Err(CoreError::Internal(format!(
            "{action} affected {affected} rows for stock row {row_id}"
        )));
    }
    Ok(())
}
