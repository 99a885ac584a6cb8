mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{decimal, TestApp};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{json, Value};

#[tokio::test]
async fn category_crud_round_trip() {
    let app = TestApp::new().await;

    let (status, created) = app
        .post("/api/categories", json!({ "name": "Cabling", "unit": "meters" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = app
        .put(&format!("/api/categories/{}", id), json!({ "unit": "feet" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Cabling");
    assert_eq!(updated["unit"], "feet");

    let (status, _) = app.delete(&format!("/api/categories/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/categories/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Category {} not found", id));
}

#[tokio::test]
async fn lists_are_sorted_by_name() {
    let app = TestApp::new().await;
    for name in ["Supervisor", "Installer", "Dispatcher"] {
        app.create("/api/roles", json!({ "name": name })).await;
    }

    let (status, body) = app.get("/api/roles").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Dispatcher", "Installer", "Supervisor"]);
}

#[rstest]
#[case("/api/categories", json!({ "name": "Cabling" }))]
#[case("/api/roles", json!({ "name": "  " }))]
#[case("/api/contacts", json!({ "name": "Eva", "last_name": "Mora" }))]
#[case("/api/clients", json!({ "trade_name": "Plaza" }))]
#[case("/api/suppliers", json!({}))]
#[tokio::test]
async fn create_rejects_missing_or_blank_fields(#[case] uri: &str, #[case] body: Value) {
    let app = TestApp::new().await;

    let (status, response) = app.post(uri, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_matches!(response["message"].as_str(), Some(msg) if msg.starts_with("Missing or invalid fields"));
}

#[tokio::test]
async fn empty_patch_and_missing_record_are_distinguished() {
    let app = TestApp::new().await;
    let id = app
        .create("/api/roles", json!({ "name": "Installer" }))
        .await;

    let (status, _) = app.put(&format!("/api/roles/{}", id), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put("/api/roles/9999", json!({ "name": "Lead" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/roles/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(axum::http::Method::GET, "/api/service-orders/abc")]
#[case(axum::http::Method::PUT, "/api/service-orders/99999999999/start")]
#[case(axum::http::Method::DELETE, "/api/service-orders/1.5")]
#[case(axum::http::Method::GET, "/api/categories/abc")]
#[case(axum::http::Method::PUT, "/api/products/-")]
#[tokio::test]
async fn malformed_ids_get_the_standard_error_body(
    #[case] method: axum::http::Method,
    #[case] uri: &str,
) {
    let app = TestApp::new().await;

    let (status, body) = app.send(method, uri, Some(json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_matches!(body["message"].as_str(), Some(msg) if msg.starts_with("Invalid path parameter"));
}

#[tokio::test]
async fn personnel_password_is_never_returned() {
    let app = TestApp::new().await;
    let seed = app.seed().await;

    let (status, body) = app
        .get(&format!("/api/personnel/{}", seed.personnel_ids[0]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ana@field.test");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn product_listings_join_supplier_and_flag_low_stock() {
    let app = TestApp::new().await;
    let seed = app.seed().await;
    app.create_product(&seed, "Access point", 2, 5).await;
    app.create_product(&seed, "Cat6 cable", 100, 10).await;
    app.create_product(&seed, "Patch panel", 0, 1).await;

    let (status, body) = app.get("/api/products/provider").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "Access point");
    assert_eq!(rows[0]["supplier_name"], "Redes del Norte");
    assert_eq!(rows[0]["category_name"], "Networking");
    assert_eq!(rows[0]["unit"], "pieces");

    let (status, body) = app.get("/api/products/available").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Access point");
    assert_eq!(rows[0]["low_stock"], true);
    assert_eq!(rows[1]["low_stock"], false);
    assert_eq!(decimal(&rows[1]["stock"]), Decimal::from(100));
}

#[tokio::test]
async fn service_order_listing_includes_names() {
    let app = TestApp::new().await;
    let seed = app.seed().await;
    let older = app
        .create_order(&seed, json!({ "scheduled_date": "2024-04-01" }))
        .await;
    let newer = app
        .create_order(
            &seed,
            json!({ "scheduled_date": "2024-06-01", "personnel_ids": seed.personnel_ids }),
        )
        .await;

    let (status, body) = app.get("/api/service-orders").await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], newer);
    assert_eq!(rows[1]["id"], older);
    assert_eq!(rows[0]["client_name"], "Hotel Plaza");
    assert_eq!(rows[0]["service_name"], "Access point installation");
    assert_eq!(rows[0]["personnel"], "Ana Ruiz, Jorge Salas");
    assert_eq!(rows[1]["personnel"], "");

    let detail = app.order(newer).await;
    let personnel = detail["personnel"].as_array().unwrap();
    assert_eq!(personnel.len(), 2);
    assert_eq!(personnel[0]["full_name"], "Ana Ruiz");
}

#[tokio::test]
async fn full_view_carries_client_service_and_lines() {
    let app = TestApp::new().await;
    let seed = app.seed().await;
    let cable = app.create_product(&seed, "Cat6 cable", 100, 10).await;
    let id = app
        .create_order(
            &seed,
            json!({ "products": [{ "product_id": cable, "quantity_used": 12 }] }),
        )
        .await;

    let (status, body) = app.get("/api/service-orders-full").await;
    assert_eq!(status, StatusCode::OK);
    let row = &body.as_array().unwrap()[0];
    assert_eq!(row["id"], id);
    assert_eq!(row["client"]["trade_name"], "Hotel Plaza");
    assert_eq!(row["service"]["name"], "Access point installation");
    assert_eq!(row["products"][0]["product_name"], "Cat6 cable");
    assert_eq!(row["products"][0]["product_unit"], "pieces");
    assert_eq!(decimal(&row["products"][0]["quantity_used"]), Decimal::from(12));
}

#[tokio::test]
async fn login_checks_the_stored_hash() {
    let app = TestApp::new().await;
    app.seed().await;

    let (status, body) = app
        .post(
            "/api/auth/login",
            json!({ "email": "ana@field.test", "password": "field-secret-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ana");
    assert!(body.get("password_hash").is_none());

    let (status, wrong_password) = app
        .post(
            "/api/auth/login",
            json!({ "email": "ana@field.test", "password": "nope-nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_user) = app
        .post(
            "/api/auth/login",
            json!({ "email": "ghost@field.test", "password": "field-secret-1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["message"], unknown_user["message"]);

    let (status, _) = app.post("/api/auth/login", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_database_and_request_id() {
    let app = TestApp::new().await;

    let response = app
        .request(axum::http::Method::GET, "/health", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let (_, body) = app.get("/health").await;
    assert_eq!(body["status"], "up");
    assert_eq!(body["details"]["database"]["status"], "up");
}
