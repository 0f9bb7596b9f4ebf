//! HTTP-level integration tests for the product catalogue endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_bytes, body_json, delete, get, post_json, put_json, send_raw};
use product_core::seed::seed_products;
use product_db::repositories::ProductRepo;
use serde_json::json;
use sqlx::PgPool;

async fn seed(pool: &PgPool) {
    ProductRepo::seed_if_empty(pool, &seed_products())
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Listing and lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_seeded_catalogue(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let products = json.as_array().unwrap();
    assert_eq!(products.len(), 10);
    assert_eq!(products[0]["id"], 1);
    assert_eq!(products[0]["name"], "UltraSlim X1 Laptop");
    assert_eq!(products[9]["id"], 10);
    assert!(products.iter().all(|p| p.get("_id").is_none()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_empty_catalogue(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/").await).await;
    assert_eq!(json, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_product_by_id(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/2").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "NoiseGuard Pro Headphones");
    assert_eq!(json["price"], 349.99);
    assert_eq!(json["image"], "/images/headphones_pro.jpg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_product_returns_404(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = get(app, "/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Product not found");
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_integer_id_returns_404(pool: PgPool) {
    seed(&pool).await;
    for uri in ["/abc", "/-1", "/1.5"] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "uri {uri}");
    }
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_assigns_next_id(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = post_json(
        app,
        "/",
        json!({"name": "Desk Lamp", "price": 39.99, "category": "Home"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let created = body_json(response).await;
    assert_eq!(created["id"], 11);
    assert_eq!(created["name"], "Desk Lamp");
    assert!(created.get("_id").is_none());

    let app = common::build_test_app(pool);
    let fetched = body_json(get(app, "/11").await).await;
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_on_empty_catalogue_starts_at_one(pool: PgPool) {
    let app = common::build_test_app(pool);
    let created = body_json(post_json(app, "/", json!({"name": "First"})).await).await;
    assert_eq!(created["id"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_ignores_client_id(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let created = body_json(post_json(app, "/", json!({"id": 3, "name": "Imposter"})).await).await;
    assert_eq!(created["id"], 11);

    let app = common::build_test_app(pool);
    let original = body_json(get(app, "/3").await).await;
    assert_eq!(original["name"], "Visionary 4K Monitor");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_after_delete_of_highest_reuses_id(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());
    delete(app, "/10").await;

    let app = common::build_test_app(pool);
    let created = body_json(post_json(app, "/", json!({"name": "Replacement"})).await).await;
    assert_eq!(created["id"], 10);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_invalid_bodies(pool: PgPool) {
    for body in [json!({}), json!([]), json!("text"), json!(null)] {
        let app = common::build_test_app(pool.clone());
        let response = post_json(app, "/", body.clone()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid input");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_malformed_json_and_wrong_content_type(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = send_raw(app, Method::POST, "/", "application/json", "{not json").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let response = send_raw(app, Method::POST, "/", "text/plain", r#"{"name":"x"}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_creates_all_succeed_with_distinct_ids(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..20 {
        let app = app.clone();
        tasks.spawn(async move {
            let response = post_json(app, "/", json!({"name": format!("p{i}")})).await;
            let status = response.status();
            (status, body_json(response).await)
        });
    }

    let mut ids = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (status, created) = joined.unwrap();
        assert_eq!(status, StatusCode::OK, "body {created}");
        ids.push(created["id"].as_i64().unwrap());
    }
    ids.sort_unstable();
    assert_eq!(ids, (1..=20).collect::<Vec<i64>>());

    let app = common::build_test_app(pool);
    let listed = body_json(get(app, "/").await).await;
    assert_eq!(listed.as_array().unwrap().len(), 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_nul_characters(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(app, "/", json!({"name": "bad\u{0}name"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid input");

    let app = common::build_test_app(pool);
    assert_eq!(body_json(get(app, "/").await).await, json!([]));
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_merges_fields(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = put_json(app, "/", json!({"id": 4, "price": 449.99, "onSale": true})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["id"], 4);
    assert_eq!(updated["price"], 449.99);
    assert_eq!(updated["onSale"], true);
    assert_eq!(updated["name"], "GamerZ Console 5");

    let app = common::build_test_app(pool);
    let fetched = body_json(get(app, "/4").await).await;
    assert_eq!(fetched, updated);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_without_id_returns_400(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);
    let response = put_json(app, "/", json!({"name": "No id"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_nul_characters(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());
    let response = put_json(app, "/", json!({"id": 1, "tags": ["ok", "bad\u{0}"]})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid input");

    let app = common::build_test_app(pool);
    let unchanged = body_json(get(app, "/1").await).await;
    assert!(unchanged.get("tags").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_unknown_id_returns_404(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool);
    let response = put_json(app, "/", json!({"id": 404, "name": "Ghost"})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_returns_200_then_404(pool: PgPool) {
    seed(&pool).await;
    let app = common::build_test_app(pool.clone());

    let response = delete(app, "/5").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_bytes(response).await.is_empty());

    let app = common::build_test_app(pool.clone());
    assert_eq!(get(app, "/5").await.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    assert_eq!(delete(app, "/5").await.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let remaining = body_json(get(app, "/").await).await;
    assert_eq!(remaining.as_array().unwrap().len(), 9);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_non_integer_id_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    assert_eq!(delete(app, "/laptop").await.status(), StatusCode::NOT_FOUND);
}
