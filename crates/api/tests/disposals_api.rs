mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{build_test_app, error_code, get, post_empty, post_json, seed_collective};

const DISPOSED: i64 = 4;
const NORMAL: i64 = 1;

#[sqlx::test(migrations = "../../db/migrations")]
async fn dispose_all_then_undo(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 5).await;

    let (status, disposal) = post_json(
        &app,
        &format!("/api/v1/masters/{number}/disposals"),
        json!({ "quantity": 5, "reason": "worn out", "processed_by": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{disposal}");
    assert_eq!(disposal["quantity"], 5);
    let disposal_uid = disposal["disposal_uid"].as_str().unwrap().to_string();

    let (_, stock) = get(&app, &format!("/api/v1/masters/{number}/stock")).await;
    assert_eq!(stock["quantity"], 0);
    assert_eq!(stock["status_id"], DISPOSED);

    let (status, fetched) = get(&app, &format!("/api/v1/disposals/{disposal_uid}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["reason"], "worn out");

    let (status, undone) =
        post_empty(&app, &format!("/api/v1/masters/{number}/disposals/undo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(undone["disposal_uid"], disposal_uid.as_str());

    let (_, stock) = get(&app, &format!("/api/v1/masters/{number}/stock")).await;
    assert_eq!(stock["quantity"], 5);
    assert_eq!(stock["status_id"], NORMAL);

    let (status, _) = get(&app, &format!("/api/v1/disposals/{disposal_uid}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disposal_beyond_stock_is_conflict(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 2).await;

    let (status, body) = post_json(
        &app,
        &format!("/api/v1/masters/{number}/disposals"),
        json!({ "quantity": 3 }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_code(&body), "Conflict");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn undo_without_disposal_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);
    let number = seed_collective(&app, 2).await;

    let (status, body) =
        post_empty(&app, &format!("/api/v1/masters/{number}/disposals/undo")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NotFound");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_disposals_by_master(pool: PgPool) {
    let app = build_test_app(pool);
    let first = seed_collective(&app, 5).await;
    let second = seed_collective(&app, 5).await;
    for number in [&first, &first, &second] {
        post_json(
            &app,
            &format!("/api/v1/masters/{number}/disposals"),
            json!({ "quantity": 1 }),
        )
        .await;
    }

    let (_, all) = get(&app, "/api/v1/disposals").await;
    assert_eq!(all["total"], 3);

    let (status, filtered) =
        get(&app, &format!("/api/v1/disposals?management_number={first}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filtered["total"], 2);
}
