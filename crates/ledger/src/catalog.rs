//! Asset master catalog and management number allocation.

use sqlx::{PgExecutor, Postgres, Transaction};
use stockroom_core::error::CoreError;
use stockroom_core::management_number::{format_management_number, placeholder};
use stockroom_core::pagination::{Page, Paged};
use stockroom_core::stock::ManagementCategory;
use stockroom_core::types::DbId;
use stockroom_core::validation::{normalize_optional, reject_blank, require_text};
use stockroom_db::error::classify;
use stockroom_db::models::master::{
    AssetMaster, CreateAssetMaster, MasterFilter, UpdateAssetMaster,
};
use stockroom_db::models::summary::InventorySummary;
use stockroom_db::repositories::{DisposalRepo, LendRepo, MasterRepo, ReturnRepo, StockRepo};

use crate::context::LedgerContext;

/// Resolve a management number to its master row.
pub(crate) async fn resolve_master<'e, E>(
    executor: E,
    management_number: &str,
) -> Result<AssetMaster, CoreError>
where
    E: PgExecutor<'e>,
{
    MasterRepo::find_by_management_number(executor, management_number)
        .await
        .map_err(classify)?
        .ok_or_else(|| CoreError::not_found("Asset master", management_number))
}

/// Rows removed by [`AssetMasterCatalog::delete_master`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct DeletionReport {
    pub returns: u64,
    pub lends: u64,
    pub disposals: u64,
    pub stock_rows: u64,
}

#[derive(Clone)]
pub struct AssetMasterCatalog {
    ctx: LedgerContext,
}

impl AssetMasterCatalog {
    pub fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    /// Register a master and allocate its management number.
    ///
    /// The row is first inserted under a `TMP-` placeholder to obtain its
    /// id, then the final `<prefix>-<YYYYMMDD>-<id>` number replaces it in
    /// the same transaction. A failure after the reservation rolls the
    /// reservation back explicitly; duplicates surface as `Conflict` and are
    /// never retried here.
    pub async fn create_master(&self, input: CreateAssetMaster) -> Result<AssetMaster, CoreError> {
        self.ctx
            .bounded("create_master", self.create_master_tx(input))
            .await
    }

    async fn create_master_tx(&self, mut input: CreateAssetMaster) -> Result<AssetMaster, CoreError> {
        require_text("name", &input.name)?;
        require_text("manufacturer", &input.manufacturer)?;
        let category_id = input.management_category_id.ok_or_else(|| {
            CoreError::Validation("management_category_id is required".to_string())
        })?;
        ManagementCategory::from_id(category_id)?;
        let genre_id = input
            .genre_id
            .ok_or_else(|| CoreError::Validation("genre_id is required".to_string()))?;
        let prefix = self
            .ctx
            .config
            .genre_prefixes
            .prefix_for(genre_id)
            .ok_or_else(|| {
                CoreError::Validation(format!("genre {genre_id} has no management number prefix"))
            })?
            .to_string();
        input.model = normalize_optional(input.model.as_deref());

        let now = self.ctx.clock.now();
        let token = placeholder(self.ctx.ids.next_id(now));

        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let reserved = MasterRepo::insert_reserved(&mut *tx, &token, &input)
            .await
            .map_err(classify)?;

        let number = format_management_number(
            &prefix,
            now.with_timezone(&self.ctx.config.registration_offset)
                .date_naive(),
            reserved.id,
            self.ctx.config.pad_width,
        );
        let master = match MasterRepo::finalize_number(&mut *tx, reserved.id, &token, &number).await
        {
            Ok(Some(master)) => master,
            Ok(None) => {
                let err = CoreError::Internal(format!(
                    "reserved master {} lost its placeholder",
                    reserved.id
                ));
                return Err(release_reservation(tx, reserved.id, err).await);
            }
            Err(e) => return Err(release_reservation(tx, reserved.id, classify(e)).await),
        };
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            master_id = master.id,
            management_number = %master.management_number,
            genre_id,
            "Asset master registered",
        );
        Ok(master)
    }

    pub async fn get_by_management_number(
        &self,
        management_number: &str,
    ) -> Result<AssetMaster, CoreError> {
        self.ctx
            .bounded(
                "get_master",
                resolve_master(&self.ctx.pool, management_number),
            )
            .await
    }

    pub async fn list(
        &self,
        filter: MasterFilter,
        page: Page,
    ) -> Result<Paged<AssetMaster>, CoreError> {
        self.ctx
            .bounded("list_masters", async {
                let items = MasterRepo::list(&self.ctx.pool, &filter, &page)
                    .await
                    .map_err(classify)?;
                let total = MasterRepo::count(&self.ctx.pool, &filter)
                    .await
                    .map_err(classify)?;
                Ok(Paged::new(items, total, &page))
            })
            .await
    }

    /// Update name, manufacturer or model. The management number and id are
    /// not part of the patch and never change.
    pub async fn update(
        &self,
        management_number: &str,
        mut patch: UpdateAssetMaster,
    ) -> Result<AssetMaster, CoreError> {
        reject_blank("name", patch.name.as_deref())?;
        reject_blank("manufacturer", patch.manufacturer.as_deref())?;
        patch.model = normalize_optional(patch.model.as_deref());

        self.ctx
            .bounded("update_master", async {
                let master = MasterRepo::update(&self.ctx.pool, management_number, &patch)
                    .await
                    .map_err(classify)?
                    .ok_or_else(|| CoreError::not_found("Asset master", management_number))?;
                tracing::info!(
                    master_id = master.id,
                    management_number = %master.management_number,
                    "Asset master updated",
                );
                Ok(master)
            })
            .await
    }

    /// Delete a master together with its stock row and event history.
    ///
    /// Refused with `Conflict` while any lend of the master is outstanding.
    /// The stock row is locked before the master row, the same order every
    /// other engine follows, so a concurrent lend cannot deadlock with it.
    pub async fn delete_master(&self, management_number: &str) -> Result<DeletionReport, CoreError> {
        self.ctx
            .bounded("delete_master", self.delete_master_tx(management_number))
            .await
    }

    async fn delete_master_tx(&self, management_number: &str) -> Result<DeletionReport, CoreError> {
        let mut tx = self.ctx.pool.begin().await.map_err(classify)?;
        let master = resolve_master(&mut *tx, management_number).await?;
        StockRepo::lock_for_master(&mut *tx, master.id)
            .await
            .map_err(classify)?;
        MasterRepo::lock_by_management_number(&mut *tx, management_number)
            .await
            .map_err(classify)?
            .ok_or_else(|| CoreError::not_found("Asset master", management_number))?;

        let outstanding = LendRepo::count_outstanding_for_master(&mut *tx, master.id)
            .await
            .map_err(classify)?;
        if outstanding > 0 {
            tracing::warn!(
                management_number,
                outstanding,
                "Refusing to delete master with outstanding lends",
            );
            return Err(CoreError::Conflict(format!(
                "asset has {outstanding} outstanding lend(s)"
            )));
        }

        let report = DeletionReport {
            returns: ReturnRepo::delete_for_master(&mut *tx, master.id)
                .await
                .map_err(classify)?,
            lends: LendRepo::delete_for_master(&mut *tx, master.id)
                .await
                .map_err(classify)?,
            disposals: DisposalRepo::delete_for_master(&mut *tx, master.id)
                .await
                .map_err(classify)?,
            stock_rows: StockRepo::delete_for_master(&mut *tx, master.id)
                .await
                .map_err(classify)?,
        };
        if !MasterRepo::delete(&mut *tx, master.id).await.map_err(classify)? {
            return Err(CoreError::Internal(format!(
                "master {} vanished during deletion",
                master.id
            )));
        }
        tx.commit().await.map_err(classify)?;

        tracing::info!(
            master_id = master.id,
            management_number,
            returns = report.returns,
            lends = report.lends,
            disposals = report.disposals,
            "Asset master deleted",
        );
        Ok(report)
    }

    pub async fn summary(&self) -> Result<InventorySummary, CoreError> {
        self.ctx
            .bounded("summary", async {
                MasterRepo::summary(&self.ctx.pool).await.map_err(classify)
            })
            .await
    }
}

/// Roll back a reservation whose finalization failed, returning `cause`.
async fn release_reservation(
    tx: Transaction<'_, Postgres>,
    master_id: DbId,
    cause: CoreError,
) -> CoreError {
    tracing::warn!(master_id, error = %cause, "Releasing management number reservation");
    if let Err(e) = tx.rollback().await {
        tracing::error!(master_id, error = %e, "Reservation rollback failed");
    }
    cause
}
