//! HTTP-level integration tests for the build catalog, master data and
//! admin build endpoints.
//!
//! Master rows are seeded with plain SQL; builds are created either through
//! the repository (read-path tests) or through the admin API (write-path tests).

mod common;

use axum::http::StatusCode;
use common::{
    admin_token, body_json, build_test_app, delete, get, get_auth, post_json, put_json,
    user_token,
};
use gearlog_core::types::DbId;
use gearlog_db::models::build::{BuildPayload, CradleItemInput, GearItemInput};
use gearlog_db::repositories::BuildRepo;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed(pool: &PgPool, table: &str, column: &str, name: &str) -> DbId {
    sqlx::query_scalar(&format!("INSERT INTO {table} ({column}) VALUES ($1) RETURNING id"))
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn seed_weapon(pool: &PgPool, name: &str, dmg_type_id: Option<DbId>) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO weapon_master_list (weapon_name, weapon_type, dmg_type_id)
         VALUES ($1, 'rifle', $2) RETURNING id",
    )
    .bind(name)
    .bind(dmg_type_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

struct Seeded {
    calibration: DbId,
    helmet: DbId,
    battery: DbId,
    rifle: DbId,
}

/// Seed the master rows of the "Frostbite Recon" example plus a frost rifle.
async fn seed_masters(pool: &PgPool) -> Seeded {
    let frost = seed(pool, "dmg_types", "label", "Frost").await;
    Seeded {
        calibration: seed(pool, "calibration", "name", "Cryo Tuning").await,
        helmet: seed(pool, "gear_set_master_list", "set_name", "Arctic Helm").await,
        battery: seed(pool, "cradle_master_list", "item_name", "Thermal Battery").await,
        rifle: seed_weapon(pool, "Glacier Rifle", Some(frost)).await,
    }
}

async fn create_frostbite(pool: &PgPool, s: &Seeded) -> DbId {
    let payload = BuildPayload {
        build_name: "Frostbite Recon".to_string(),
        calibration_id: Some(s.calibration),
        gear_items: vec![
            GearItemInput {
                slot_name: "helmet".to_string(),
                gear_set_id: Some(s.helmet),
                ..Default::default()
            },
            GearItemInput {
                slot_name: "weapon_1".to_string(),
                weapon_id: Some(s.rifle),
                ..Default::default()
            },
        ],
        cradle_items: vec![CradleItemInput {
            cradle_item_id: s.battery,
            slot_number: 1,
        }],
        ..Default::default()
    };
    BuildRepo::create(pool, &payload).await.unwrap().id
}

fn frostbite_json(s: &Seeded) -> serde_json::Value {
    json!({
        "build_name": "Frostbite Recon",
        "calibration_id": s.calibration,
        "tier": "A",
        "rating": 4,
        "stats": { "crit_rate": 12.5 },
        "gear_items": [
            { "slot_name": "helmet", "gear_set_id": s.helmet },
            { "slot_name": "weapon_1", "weapon_id": s.rifle }
        ],
        "cradle_items": [ { "cradle_item_id": s.battery, "slot_number": 1 } ],
        "abilities": []
    })
}

// ---------------------------------------------------------------------------
// Master data
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn master_data_returns_every_list(pool: PgPool) {
    seed_masters(&pool).await;
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/master-data").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    assert_eq!(data["calibrations"][0]["name"], "Cryo Tuning");
    assert_eq!(data["gear_sets"][0]["name"], "Arctic Helm");
    assert_eq!(data["weapons"][0]["name"], "Glacier Rifle");
    assert_eq!(data["dmg_types"][0]["name"], "Frost");
    assert!(data["abilities"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn master_data_failure_names_failed_lists(pool: PgPool) {
    sqlx::query("DROP TABLE calibration CASCADE")
        .execute(&pool)
        .await
        .unwrap();
    let app = build_test_app(pool);

    let response = get(app, "/api/v1/master-data").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "MASTER_DATA_UNAVAILABLE");
    assert_eq!(json["error"], "Master data failed to fetch: calibration");
}

// ---------------------------------------------------------------------------
// Public catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_build_returns_enriched_view(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let id = create_frostbite(&pool, &s).await;
    let app = build_test_app(pool);

    let response = get(app, &format!("/api/v1/builds/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let build = &json["data"];
    assert_eq!(build["name"], "Frostbite Recon");
    assert_eq!(build["calibration"], "Cryo Tuning");
    assert_eq!(build["gear"]["helmet"]["item"], "Arctic Helm");
    assert_eq!(build["gear"]["helmet"]["hide"], "N/A");
    assert_eq!(build["gear"]["helmet"]["mod"], "N/A");
    assert_eq!(build["gear"]["jacket"]["item"], "N/A");
    assert_eq!(build["weapon"], "Glacier Rifle");
    assert_eq!(build["dmg_type"], "Frost");
    assert_eq!(build["cradle"], json!(["Thermal Battery"]));
    assert_eq!(build["author"], "ANONYMOUS_OPERATIVE");
    assert_eq!(build["tier"], "B");
    assert_eq!(build["rating"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_build_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, &format!("/api/v1/builds/{}", Uuid::new_v4())).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_builds_supports_search_and_element(pool: PgPool) {
    let s = seed_masters(&pool).await;
    create_frostbite(&pool, &s).await;
    BuildRepo::create(
        &pool,
        &BuildPayload {
            build_name: "Plain Jane".to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let all = body_json(get(build_test_app(pool.clone()), "/api/v1/builds").await).await;
    let names: Vec<_> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Frostbite Recon", "Plain Jane"]);

    // Gear item names are searchable, case-insensitively.
    let by_item = body_json(get(build_test_app(pool.clone()), "/api/v1/builds?q=arctic").await).await;
    assert_eq!(by_item["data"].as_array().unwrap().len(), 1);
    assert_eq!(by_item["data"][0]["name"], "Frostbite Recon");

    let by_element =
        body_json(get(build_test_app(pool.clone()), "/api/v1/builds?element=None").await).await;
    assert_eq!(by_element["data"].as_array().unwrap().len(), 1);
    assert_eq!(by_element["data"][0]["name"], "Plain Jane");

    let everything =
        body_json(get(build_test_app(pool), "/api/v1/builds?element=All&q=").await).await;
    assert_eq!(everything["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_requires_a_valid_token(pool: PgPool) {
    let response = get(build_test_app(pool.clone()), "/api/v1/auth/session").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/auth/session", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool), "/api/v1/auth/session", &user_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["is_admin"], false);
    assert!(json["data"]["user_id"].is_string());
}

// ---------------------------------------------------------------------------
// Admin authorization
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_routes_reject_anonymous_and_non_admin(pool: PgPool) {
    let body = json!({ "build_name": "Sneaky" });

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/builds",
        "not-a-jwt",
        body.clone(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/builds",
        &user_token(),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/admin/builds/{}", Uuid::new_v4()),
        &user_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    assert!(BuildRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn raw_build_requires_admin(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let id = create_frostbite(&pool, &s).await;
    let uri = format!("/api/v1/builds/{id}/raw");

    let response = get(build_test_app(pool.clone()), &uri).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(build_test_app(pool), &uri, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let raw = &json["data"];
    assert_eq!(raw["build_name"], "Frostbite Recon");
    assert_eq!(raw["gear"].as_array().unwrap().len(), 2);
    assert_eq!(raw["cradle"][0]["item_slot"], 1);
    assert!(raw["abilities"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Admin writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_build_then_read_enriched(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let token = admin_token();

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/builds",
        &token,
        frostbite_json(&s),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["data"]["views"], 0);

    let build = body_json(get(build_test_app(pool), &format!("/api/v1/builds/{id}")).await).await;
    assert_eq!(build["data"]["tier"], "A");
    assert_eq!(build["data"]["rating"], 4);
    assert_eq!(build["data"]["stats"]["crit_rate"], 12.5);
    assert_eq!(build["data"]["stats"]["hp"], 0.0);
    assert_eq!(build["data"]["weapons"]["primary"]["item"], "Glacier Rifle");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_rejects_invalid_payloads(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let token = admin_token();

    let mut blank_name = frostbite_json(&s);
    blank_name["build_name"] = json!("   ");

    let mut accessory = frostbite_json(&s);
    accessory["gear_items"] = json!([{ "slot_name": "accessory", "gear_set_id": s.helmet }]);

    let mut duplicate_slot = frostbite_json(&s);
    duplicate_slot["gear_items"] = json!([
        { "slot_name": "helmet", "gear_set_id": s.helmet },
        { "slot_name": "helmet", "gear_set_id": s.helmet }
    ]);

    let mut cradle_out_of_range = frostbite_json(&s);
    cradle_out_of_range["cradle_items"] = json!([{ "cradle_item_id": s.battery, "slot_number": 9 }]);

    let mut bad_tier = frostbite_json(&s);
    bad_tier["tier"] = json!("Z");

    for body in [blank_name, accessory, duplicate_slot, cradle_out_of_range, bad_tier] {
        let response = post_json(
            build_test_app(pool.clone()),
            "/api/v1/admin/builds",
            &token,
            body,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    assert!(BuildRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_with_unknown_reference_rolls_back(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let mut body = frostbite_json(&s);
    body["cradle_items"] = json!([{ "cradle_item_id": Uuid::new_v4(), "slot_number": 1 }]);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/admin/builds",
        &admin_token(),
        body,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_REFERENCE");

    assert!(BuildRepo::list(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_replaces_build(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let id = create_frostbite(&pool, &s).await;
    let uri = format!("/api/v1/admin/builds/{id}");

    let body = json!({
        "build_name": "Frostbite Recon II",
        "gear_items": [ { "slot_name": "melee", "weapon_id": s.rifle } ]
    });
    let response = put_json(build_test_app(pool.clone()), &uri, &admin_token(), body).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["build_name"], "Frostbite Recon II");

    let build = body_json(get(build_test_app(pool), &format!("/api/v1/builds/{id}")).await).await;
    let data = &build["data"];
    assert_eq!(data["calibration"], "N/A");
    assert_eq!(data["gear"]["helmet"]["item"], "N/A");
    assert_eq!(data["weapons"]["melee"]["item"], "Glacier Rifle");
    assert_eq!(data["weapon"], "N/A");
    assert_eq!(data["gear_list"].as_array().unwrap().len(), 1);
    assert!(data["cradle"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_missing_build_returns_404(pool: PgPool) {
    let response = put_json(
        build_test_app(pool),
        &format!("/api/v1/admin/builds/{}", Uuid::new_v4()),
        &admin_token(),
        json!({ "build_name": "Ghost" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_build_then_404(pool: PgPool) {
    let s = seed_masters(&pool).await;
    let id = create_frostbite(&pool, &s).await;
    let uri = format!("/api/v1/admin/builds/{id}");
    let token = admin_token();

    let response = delete(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool.clone()), &format!("/api/v1/builds/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
