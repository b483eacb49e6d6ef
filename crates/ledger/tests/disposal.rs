mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::Page;
use stockroom_core::stock::StockStatus;
use stockroom_db::models::disposal::{CreateDisposal, DisposalFilter};
use stockroom_db::models::lend::{CreateLend, CreateLendReturn};
use stockroom_ledger::disposal::INSUFFICIENT_FOR_DISPOSAL;
use uuid::Uuid;

use common::{ledger, seed, stock_of, COLLECTIVE, INDIVIDUAL};

fn dispose(quantity: i32) -> CreateDisposal {
    CreateDisposal {
        quantity,
        reason: Some("worn out".to_string()),
        processed_by: Some("desk".to_string()),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dispose_to_zero_then_undo(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 5).await;

    let disposal = ledger
        .disposal
        .create_disposal(&master.management_number, dispose(5))
        .await
        .unwrap();
    assert_eq!(disposal.quantity, 5);
    assert_eq!(
        stock_of(&ledger, &master.management_number).await,
        (0, StockStatus::Disposed.id())
    );

    let undone = ledger
        .disposal
        .undo_disposal(&master.management_number)
        .await
        .unwrap();
    assert_eq!(undone.disposal_uid, disposal.disposal_uid);
    assert_eq!(
        stock_of(&ledger, &master.management_number).await,
        (5, StockStatus::Normal.id())
    );
    assert_matches!(
        ledger.disposal.get_disposal(disposal.disposal_uid).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_disposal_keeps_status(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 5).await;
    ledger
        .disposal
        .create_disposal(&master.management_number, dispose(2))
        .await
        .unwrap();
    assert_eq!(
        stock_of(&ledger, &master.management_number).await,
        (3, StockStatus::Normal.id())
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_disposal_beyond_stock_is_conflict(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 5).await;
    assert_matches!(
        ledger
            .disposal
            .create_disposal(&master.management_number, dispose(6))
            .await,
        Err(CoreError::Conflict(msg)) if msg == INSUFFICIENT_FOR_DISPOSAL
    );
    assert_eq!(stock_of(&ledger, &master.management_number).await.0, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_individual_items_dispose_one_unit(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, INDIVIDUAL, 1).await;
    assert_matches!(
        ledger
            .disposal
            .create_disposal(&master.management_number, dispose(2))
            .await,
        Err(CoreError::Validation(_))
    );
    ledger
        .disposal
        .create_disposal(&master.management_number, dispose(1))
        .await
        .unwrap();
    assert_eq!(
        stock_of(&ledger, &master.management_number).await,
        (0, StockStatus::Disposed.id())
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_undo_targets_latest_disposal(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 10).await;
    ledger
        .disposal
        .create_disposal(&master.management_number, dispose(1))
        .await
        .unwrap();
    let latest = ledger
        .disposal
        .create_disposal(&master.management_number, dispose(3))
        .await
        .unwrap();

    let undone = ledger
        .disposal
        .undo_disposal(&master.management_number)
        .await
        .unwrap();
    assert_eq!(undone.id, latest.id);
    assert_eq!(stock_of(&ledger, &master.management_number).await.0, 9);

    let remaining = ledger
        .disposal
        .list_disposals(
            DisposalFilter {
                management_number: Some(master.management_number.clone()),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].quantity, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_undo_without_disposal_is_not_found(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 2).await;
    assert_matches!(
        ledger.disposal.undo_disposal(&master.management_number).await,
        Err(CoreError::NotFound { .. })
    );
    assert_matches!(
        ledger.disposal.get_disposal(Uuid::now_v7()).await,
        Err(CoreError::NotFound { .. })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_return_after_disposal_to_zero_restores_normal(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 3).await;
    let lend = ledger
        .lending
        .create_lend(
            &master.management_number,
            CreateLend {
                quantity: 1,
                borrower: "alice".to_string(),
                due_on: None,
                lent_by: None,
                note: None,
            },
        )
        .await
        .unwrap();
    ledger
        .disposal
        .create_disposal(&master.management_number, dispose(2))
        .await
        .unwrap();
    assert_eq!(
        stock_of(&ledger, &master.management_number).await,
        (0, StockStatus::Disposed.id())
    );

    ledger
        .lending
        .create_return(
            lend.lend.lend_uid,
            CreateLendReturn {
                quantity: 1,
                processed_by: None,
                note: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(
        stock_of(&ledger, &master.management_number).await,
        (1, StockStatus::Normal.id())
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_disposals_never_go_negative(pool: PgPool) {
    let ledger = ledger(&pool);
    let master = seed(&ledger, COLLECTIVE, 3).await;

    let (a, b) = tokio::join!(
        ledger
            .disposal
            .create_disposal(&master.management_number, dispose(2)),
        ledger
            .disposal
            .create_disposal(&master.management_number, dispose(2)),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(stock_of(&ledger, &master.management_number).await.0, 1);
}
