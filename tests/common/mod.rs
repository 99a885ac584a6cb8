#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;

use fieldservice_api::{
    app_router,
    config::{AppConfig, StockPolicy},
    db, AppState,
};

/// Ids of the reference rows every workflow test needs.
#[derive(Debug, Clone)]
pub struct Seed {
    pub client_id: i32,
    pub service_id: i32,
    pub category_id: i32,
    pub supplier_id: i32,
    pub personnel_ids: Vec<i32>,
}

/// Helper harness for spinning up the application against a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_stock_policy(StockPolicy::ConfirmOnly).await
    }

    pub async fn with_stock_policy(stock_policy: StockPolicy) -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // A single connection keeps the whole in-memory database alive and shared.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;
        cfg.cors_allow_any_origin = true;
        cfg.stock_policy = stock_policy;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let cors = fieldservice_api::build_cors_layer(&cfg).expect("permissive cors for tests");
        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone(), cors);

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and decodes the JSON body (`Value::Null` for empty bodies).
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not json")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    /// Creates a record through the API and returns its id.
    pub async fn create(&self, uri: &str, body: Value) -> i32 {
        let (status, value) = self.post(uri, body).await;
        assert_eq!(status, StatusCode::CREATED, "create {} failed: {}", uri, value);
        value["id"].as_i64().expect("created record has an id") as i32
    }

    /// Seeds a client, a service, a category, a supplier and two technicians.
    pub async fn seed(&self) -> Seed {
        let category_id = self
            .create(
                "/api/categories",
                json!({ "name": "Networking", "unit": "pieces" }),
            )
            .await;
        let supplier_id = self
            .create(
                "/api/suppliers",
                json!({
                    "trade_name": "Redes del Norte",
                    "business_type": "Distributor",
                    "cell_number": "555-0100",
                    "email": "ventas@redes.test",
                    "country": "MX",
                    "state": "NL",
                    "city": "Monterrey",
                    "contact_name": "Carla",
                    "contact_cell_phone": "555-0101"
                }),
            )
            .await;
        let client_id = self
            .create(
                "/api/clients",
                json!({
                    "trade_name": "Hotel Plaza",
                    "business_type": "Hospitality",
                    "phone_or_cell": "555-0200",
                    "email": "it@plaza.test",
                    "street": "Av. Juarez",
                    "number": "100",
                    "city": "Monterrey",
                    "country": "MX",
                    "state": "NL",
                    "contact_name": "Luis",
                    "contact_cell_phone": "555-0201",
                    "contact_email": "luis@plaza.test"
                }),
            )
            .await;
        let service_id = self
            .create(
                "/api/services",
                json!({
                    "name": "Access point installation",
                    "category_id": category_id,
                    "sale_price": 1500,
                    "description": "Mount and configure a wireless access point"
                }),
            )
            .await;
        let role_id = self
            .create("/api/roles", json!({ "name": "Technician" }))
            .await;

        let mut personnel_ids = Vec::new();
        for (name, last_name, email) in [
            ("Ana", "Ruiz", "ana@field.test"),
            ("Jorge", "Salas", "jorge@field.test"),
        ] {
            let id = self
                .create(
                    "/api/personnel",
                    json!({
                        "name": name,
                        "last_name": last_name,
                        "role_id": role_id,
                        "email": email,
                        "cell_number": "555-0300",
                        "country": "MX",
                        "state": "NL",
                        "city": "Monterrey",
                        "address": "Calle 5",
                        "password": "field-secret-1"
                    }),
                )
                .await;
            personnel_ids.push(id);
        }

        Seed {
            client_id,
            service_id,
            category_id,
            supplier_id,
            personnel_ids,
        }
    }

    /// Creates a product with the given stock levels.
    pub async fn create_product(&self, seed: &Seed, name: &str, stock: i64, minimum: i64) -> i32 {
        self.create(
            "/api/products",
            json!({
                "name": name,
                "category_id": seed.category_id,
                "description": format!("{} for installs", name),
                "sale_price": 250,
                "supplier_id": seed.supplier_id,
                "manufacturer_brand": "Ubiquiti",
                "initial_stock": stock,
                "minimum_stock": minimum
            }),
        )
        .await
    }

    /// Creates a pending order and returns its id.
    pub async fn create_order(&self, seed: &Seed, extra: Value) -> i32 {
        let mut body = json!({
            "client_id": seed.client_id,
            "service_id": seed.service_id,
            "contact_name": "Luis",
            "contact_phone": "555-0201",
            "contact_email": "luis@plaza.test",
            "scheduled_date": "2024-05-02",
            "price": 1500,
            "activities": "Install two access points in the lobby"
        });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (key, value) in extra {
                base.insert(key.clone(), value.clone());
            }
        }
        self.create("/api/service-orders", body).await
    }

    pub async fn order(&self, id: i32) -> Value {
        let (status, value) = self.get(&format!("/api/service-orders/{}", id)).await;
        assert_eq!(status, StatusCode::OK, "fetch order {} failed: {}", id, value);
        value
    }
}

/// Reads a decimal that may be serialized as a JSON string or number.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal: {}", other),
    }
}
