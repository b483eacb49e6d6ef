//! Shared helpers for ledger integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sqlx::PgPool;
use stockroom_core::ids::FixedClock;
use stockroom_db::models::master::{AssetMaster, CreateAssetMaster};
use stockroom_db::models::stock::CreateStockItem;
use stockroom_ledger::{Ledger, LedgerConfig, LedgerContext};

pub const COLLECTIVE: i16 = 2;
pub const INDIVIDUAL: i16 = 1;
pub const EMBEDDED: i16 = 4;

pub fn ledger(pool: &PgPool) -> Ledger {
    Ledger::new(LedgerContext::new(pool.clone(), LedgerConfig::default()))
}

/// A ledger whose clock is frozen at 2025-01-15 09:00 UTC.
pub fn ledger_on_jan_15(pool: &PgPool) -> Ledger {
    let at = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
    Ledger::new(
        LedgerContext::new(pool.clone(), LedgerConfig::default())
            .with_clock(Arc::new(FixedClock(at))),
    )
}

pub fn new_master(name: &str, category: i16) -> CreateAssetMaster {
    CreateAssetMaster {
        name: name.to_string(),
        management_category_id: Some(category),
        genre_id: Some(EMBEDDED),
        manufacturer: "Acme".to_string(),
        model: Some("X1".to_string()),
    }
}

pub fn new_stock(quantity: i32) -> CreateStockItem {
    CreateStockItem {
        serial: None,
        quantity,
        purchased_on: None,
        owner: "lab".to_string(),
        location: None,
        default_location: "shelf A".to_string(),
        notes: None,
    }
}

/// Register a master of `category` with `quantity` units in stock.
pub async fn seed(ledger: &Ledger, category: i16, quantity: i32) -> AssetMaster {
    let master = ledger
        .catalog
        .create_master(new_master("Oscilloscope", category))
        .await
        .unwrap();
    ledger
        .stock
        .register_stock(&master.management_number, new_stock(quantity))
        .await
        .unwrap();
    master
}

pub async fn stock_of(ledger: &Ledger, management_number: &str) -> (i32, i16) {
    let row = ledger.stock.get_stock(management_number).await.unwrap();
    (row.quantity, row.status_id)
}
