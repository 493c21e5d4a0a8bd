//! HTTP-level tests for the catalog, drafts, affiliate and dashboard
//! endpoints.
//!
//! Most need PostgreSQL (`DATABASE_URL`) and are ignored by default; run
//! them with `cargo test -p nomnomchow-api -- --ignored`.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, delete_auth, get, get_auth, post_empty_auth, post_json,
    post_json_auth, put_json_auth, test_config, test_state,
};
use nomnomchow_db::repositories::MealStatsRepo;
use serde_json::json;
use sqlx::PgPool;

fn app(pool: PgPool) -> axum::Router {
    common::build_test_app(test_state(pool, test_config()))
}

fn token() -> String {
    admin_token(&test_config())
}

/// Create a meal through the API and return its JSON.
async fn create_meal(pool: &PgPool, body: serde_json::Value) -> serde_json::Value {
    let response = post_json_auth(app(pool.clone()), "/api/meals", body, &token()).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Offline: validation and auth happen before the database
// ---------------------------------------------------------------------------

#[tokio::test]
async fn creating_a_meal_requires_admin() {
    let response = post_json(
        common::offline_app(),
        "/api/meals",
        json!({ "title": "Tacos", "timeMinutes": 20 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_meal_is_rejected_before_touching_the_database() {
    let response = post_json_auth(
        common::offline_app(),
        "/api/meals",
        json!({ "title": "", "timeMinutes": 20 }),
        &token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let response = post_json_auth(
        common::offline_app(),
        "/api/meals",
        json!({ "title": "Tacos", "timeMinutes": 20, "skillLevel": "Expert" }),
        &token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = body_json(response).await["message"].as_str().unwrap().to_string();
    assert!(message.contains("Invalid skill level 'Expert'"));
}

#[tokio::test]
async fn non_numeric_meal_id_is_a_client_error() {
    let response = get(common::offline_app(), "/api/meals/tacos").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Meals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn meal_crud_round_trip(pool: PgPool) {
    let created = create_meal(
        &pool,
        json!({
            "title": "Chicken Quesadillas",
            "timeMinutes": 15,
            "cuisine": "Mexican",
            "skillLevel": "Easy",
            "ingredients": ["Tortillas", "Cheese", "Chicken"],
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["slug"], "chicken-quesadillas");
    assert_eq!(created["ingredients"][1], "Cheese");

    let response = put_json_auth(
        app(pool.clone()),
        &format!("/api/meals/{id}"),
        json!({ "timeMinutes": 20 }),
        &token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["timeMinutes"], 20);
    assert_eq!(updated["cuisine"], "Mexican");

    let response = delete_auth(app(pool.clone()), &format!("/api/meals/{id}"), &token()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app(pool.clone()), &format!("/api/meals/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app(pool), &format!("/api/meals/{id}"), &token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn catalog_filters_apply_together(pool: PgPool) {
    create_meal(
        &pool,
        json!({ "title": "Quick Pasta", "timeMinutes": 15, "cuisine": "Italian" }),
    )
    .await;
    create_meal(
        &pool,
        json!({ "title": "Slow Lasagna", "timeMinutes": 90, "cuisine": "Italian" }),
    )
    .await;
    create_meal(
        &pool,
        json!({ "title": "Tacos", "timeMinutes": 15, "cuisine": "Mexican" }),
    )
    .await;

    let response = get(
        app(pool.clone()),
        "/api/meals?cuisine=Italian&timeLimit=30",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["title"], "Quick Pasta");

    // Sentinels mean "no filter".
    let json = body_json(get(app(pool.clone()), "/api/meals?cuisine=Any&diet=none").await).await;
    assert_eq!(json.as_array().unwrap().len(), 3);

    let json = body_json(get(app(pool), "/api/meals?search=LASAGNA").await).await;
    assert_eq!(json[0]["title"], "Slow Lasagna");
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn viewing_a_meal_counts_the_view(pool: PgPool) {
    let created = create_meal(&pool, json!({ "title": "Tacos", "timeMinutes": 15 })).await;
    let id = created["id"].as_i64().unwrap();

    let response = get(app(pool.clone()), &format!("/api/meals/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The counter is bumped on a detached task.
    let mut views = 0;
    for _ in 0..100 {
        views = MealStatsRepo::find_by_meal(&pool, id).await.unwrap().unwrap().views;
        if views == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(views, 1);
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn sample_meals_and_image_stats(pool: PgPool) {
    let response = post_empty_auth(app(pool.clone()), "/api/admin/add-sample-meals", &token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let added = json["added"].as_u64().unwrap();
    assert!(added > 0);

    let json = body_json(post_empty_auth(app(pool.clone()), "/api/admin/add-sample-meals", &token()).await).await;
    assert_eq!(json["added"], 0);

    let stats = body_json(get_auth(app(pool.clone()), "/api/admin/image-stats", &token()).await).await;
    assert_eq!(stats["totalMeals"], added);
    assert_eq!(
        stats["withImages"].as_i64().unwrap() + stats["withoutImages"].as_i64().unwrap(),
        added as i64
    );
    assert_eq!(stats["cloudinaryConfigured"], false);

    let dashboard = body_json(get_auth(app(pool), "/api/admin/stats", &token()).await).await;
    assert_eq!(dashboard["totalMeals"], added);
    assert!(dashboard["mostViewed"].as_array().unwrap().len() <= 5);
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn submitted_draft_can_be_approved(pool: PgPool) {
    let response = post_json(
        app(pool.clone()),
        "/api/drafts",
        json!({ "title": "Egg Fried Rice", "ingredients": ["Rice", "Eggs"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let draft = body_json(response).await;
    assert_eq!(draft["status"], "pending");
    let id = draft["id"].as_i64().unwrap();

    let pending = body_json(get_auth(app(pool.clone()), "/api/drafts", &token()).await).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let response = post_empty_auth(
        app(pool.clone()),
        &format!("/api/drafts/{id}/approve"),
        &token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "approved");

    let pending = body_json(get_auth(app(pool.clone()), "/api/drafts", &token()).await).await;
    assert!(pending.as_array().unwrap().is_empty());

    let response = post_empty_auth(app(pool), "/api/drafts/9999/approve", &token()).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn rejected_draft_leaves_the_queue(pool: PgPool) {
    let draft = body_json(
        post_json(app(pool.clone()), "/api/drafts", json!({ "title": "Cold Soup" })).await,
    )
    .await;
    let id = draft["id"].as_i64().unwrap();

    let response =
        post_empty_auth(app(pool.clone()), &format!("/api/drafts/{id}/reject"), &token()).await;
    assert_eq!(body_json(response).await["status"], "rejected");

    let pending = body_json(get_auth(app(pool), "/api/drafts", &token()).await).await;
    assert!(pending.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Affiliate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn affiliate_tools_and_clicks(pool: PgPool) {
    let tool_id: i64 = sqlx::query_scalar(
        "INSERT INTO affiliate_tools (title, category, search_query, benefit, is_top_pick, bundle) \
         VALUES ('Sheet Pan', 'Bakeware', 'sheet pan', 'One-pan dinners', TRUE, 'starter') \
         RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();

    let tools = body_json(get(app(pool.clone()), "/api/affiliate/tools").await).await;
    assert_eq!(tools[0]["title"], "Sheet Pan");
    assert_eq!(tools[0]["isTopPick"], true);

    let bundle = body_json(get(app(pool.clone()), "/api/affiliate/tools/starter").await).await;
    assert_eq!(bundle.as_array().unwrap().len(), 1);
    let other = body_json(get(app(pool.clone()), "/api/affiliate/tools/pro").await).await;
    assert!(other.as_array().unwrap().is_empty());

    let response = post_json(
        app(pool.clone()),
        "/api/affiliate/click",
        json!({ "toolId": tool_id, "mealId": 424242, "page": "meal" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["success"], true);

    let response = post_json(
        app(pool),
        "/api/affiliate/click",
        json!({ "toolId": tool_id + 1, "page": "meal" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
