mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{build_test_app, error_code, get, patch_json, post_json, seed_collective};

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_twice_is_conflict(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 3).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/v1/masters/{number}/stock"),
        json!({ "quantity": 1, "owner": "lab", "default_location": "shelf C" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "Conflict");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registered_location_defaults_to_home(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 3).await;

    let (status, stock) = get(&app, &format!("/api/v1/masters/{number}/stock")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock["location"], "shelf B");
    assert_eq!(stock["default_location"], "shelf B");
    assert_eq!(stock["status_id"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn edit_flags_broken_and_records_check(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 3).await;

    let (status, stock) = patch_json(
        &app,
        &format!("/api/v1/masters/{number}/stock"),
        json!({ "broken": true, "last_checked_by": "auditor", "notes": "cracked tip" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{stock}");
    assert_eq!(stock["status_id"], 2);
    assert_eq!(stock["last_checked_by"], "auditor");
    assert!(stock["last_checked_at"].is_string());

    let (_, broken) = get(&app, "/api/v1/stock?status_id=2").await;
    assert_eq!(broken["total"], 1);
    assert_eq!(broken["items"][0]["management_number"], number.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn negative_quantity_edit_is_invalid(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 3).await;

    let (status, body) = patch_json(
        &app,
        &format!("/api/v1/masters/{number}/stock"),
        json!({ "quantity": -1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "Invalid");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stock_of_unknown_master_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let (status, body) = get(&app, "/api/v1/masters/EMB-20250101-0001/stock").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NotFound");
}
