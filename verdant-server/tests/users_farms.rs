use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use verdant_core::{
    api_routes::{self, utils as route_utils},
    database::StoreOp,
};

#[path = "support/mod.rs"]
mod support;

use support::build_test_app;

fn user_path(id: &str) -> String {
    route_utils::replace_param(api_routes::v1::users::ITEM, "{id}", id)
}

fn farm_path(id: &str) -> String {
    route_utils::replace_param(api_routes::v1::farms::ITEM, "{id}", id)
}

async fn create_user(server: &TestServer, name: &str, email: &str) -> String {
    let response = server
        .post(api_routes::v1::users::COLLECTION)
        .json(&json!({ "name": name, "email": email }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["user"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("user id missing for {email}"))
        .to_string()
}

async fn create_farm(server: &TestServer, name: &str, email: &str, owner: Option<&str>) -> String {
    let response = server
        .post(api_routes::v1::farms::COLLECTION)
        .json(&json!({ "name": name, "email": email, "owner_id": owner }))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["farm"]["id"]
        .as_str()
        .unwrap_or_else(|| panic!("farm id missing for {email}"))
        .to_string()
}

#[tokio::test]
async fn deleting_a_user_cascades_to_owned_farms() -> Result<()> {
    let app = build_test_app()?;
    let u1 = create_user(&app.server, "Una", "u1@example.com").await;
    create_farm(&app.server, "F1", "f1@example.com", Some(&u1)).await;
    create_farm(&app.server, "F2", "f2@example.com", Some(&u1)).await;
    create_farm(&app.server, "Commons", "commons@example.com", None).await;

    let response = app.server.delete(&user_path(&u1)).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["farmsDeleted"], 2);
    assert_eq!(body["cascadedFarmsDeleted"], true);

    let farms: Value = app.server.get(api_routes::v1::farms::COLLECTION).await.json();
    let farms = farms["farms"].as_array().cloned().unwrap_or_default();
    assert_eq!(farms.len(), 1);
    assert_eq!(farms[0]["name"], "Commons");

    let users: Value = app.server.get(api_routes::v1::users::COLLECTION).await.json();
    assert_eq!(users["users"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_user_is_not_found() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .delete(&user_path("0192a3c4-0000-7000-8000-000000000001"))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn failed_farm_cascade_leaves_the_user_in_place() -> Result<()> {
    let app = build_test_app()?;
    let u1 = create_user(&app.server, "Una", "u1@example.com").await;
    create_farm(&app.server, "F1", "f1@example.com", Some(&u1)).await;
    app.store.fail_on(StoreOp::DeleteFarms).await;
    app.store.reset_calls().await;

    let response = app.server.delete(&user_path(&u1)).expect_failure().await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!app.store.calls().await.contains(&StoreOp::DeleteUser));

    app.store.clear_failures().await;
    let users: Value = app.server.get(api_routes::v1::users::COLLECTION).await.json();
    assert_eq!(users["users"][0]["id"], u1);
    assert_eq!(users["users"][0]["farms"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn user_writes_enforce_required_fields_and_unique_email() -> Result<()> {
    let app = build_test_app()?;
    let ada = create_user(&app.server, "Ada", "ada@example.com").await;
    let bob = create_user(&app.server, "Bob", "bob@example.com").await;

    let missing = app
        .server
        .post(api_routes::v1::users::COLLECTION)
        .json(&json!({ "name": "No Email" }))
        .expect_failure()
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);

    let duplicate = app
        .server
        .post(api_routes::v1::users::COLLECTION)
        .json(&json!({ "name": "Ada Again", "email": "ada@example.com" }))
        .expect_failure()
        .await;
    duplicate.assert_status(StatusCode::CONFLICT);

    let steal = app
        .server
        .put(&user_path(&bob))
        .json(&json!({ "name": "Bob", "email": "ada@example.com" }))
        .expect_failure()
        .await;
    steal.assert_status(StatusCode::CONFLICT);

    let rename = app
        .server
        .put(&user_path(&ada))
        .json(&json!({ "name": "Ada Lovelace", "email": "ada@example.com", "phone": "555-0100" }))
        .await;
    rename.assert_status_ok();
    let body: Value = rename.json();
    assert_eq!(body["user"]["name"], "Ada Lovelace");
    assert_eq!(body["user"]["phone"], "555-0100");
    Ok(())
}

#[tokio::test]
async fn updating_a_missing_user_is_not_found() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .put(&user_path("0192a3c4-0000-7000-8000-0000000000ff"))
        .json(&json!({ "name": "Ghost", "email": "ghost@example.com" }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn malformed_ids_are_bad_requests() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .delete(&farm_path("not-a-uuid"))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn farms_list_with_owner_and_support_update_and_delete() -> Result<()> {
    let app = build_test_app()?;
    let ada = create_user(&app.server, "Ada", "ada@example.com").await;
    let farm = create_farm(&app.server, "North", "north@example.com", Some(&ada)).await;
    create_farm(&app.server, "South", "south@example.com", None).await;

    let listed: Value = app.server.get(api_routes::v1::farms::COLLECTION).await.json();
    assert_eq!(listed["farms"][0]["name"], "South");
    assert!(listed["farms"][0]["owner"].is_null());
    assert_eq!(listed["farms"][1]["owner"]["email"], "ada@example.com");

    let clash = app
        .server
        .put(&farm_path(&farm))
        .json(&json!({ "name": "North", "email": "south@example.com" }))
        .expect_failure()
        .await;
    clash.assert_status(StatusCode::CONFLICT);

    let updated = app
        .server
        .put(&farm_path(&farm))
        .json(&json!({ "name": "North Field", "email": "north@example.com", "website": "https://north.example.com" }))
        .await;
    updated.assert_status_ok();
    assert_eq!(updated.json::<Value>()["farm"]["website"], "https://north.example.com");

    let deleted = app.server.delete(&farm_path(&farm)).await;
    deleted.assert_status_ok();
    assert_eq!(deleted.json::<Value>()["deleted"], true);

    let again = app.server.delete(&farm_path(&farm)).expect_failure().await;
    again.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn farm_listing_survives_owner_lookup_failure() -> Result<()> {
    let app = build_test_app()?;
    let ada = create_user(&app.server, "Ada", "ada@example.com").await;
    create_farm(&app.server, "North", "north@example.com", Some(&ada)).await;
    app.store.fail_on(StoreOp::ListUsers).await;

    let response = app.server.get(api_routes::v1::farms::COLLECTION).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["farms"][0]["name"], "North");
    assert!(body["farms"][0]["owner"].is_null());
    Ok(())
}

#[tokio::test]
async fn farm_with_unknown_owner_is_rejected() -> Result<()> {
    let app = build_test_app()?;

    let response = app
        .server
        .post(api_routes::v1::farms::COLLECTION)
        .json(&json!({
            "name": "Orphan",
            "email": "orphan@example.com",
            "owner_id": "0192a3c4-0000-7000-8000-000000000042"
        }))
        .expect_failure()
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}
