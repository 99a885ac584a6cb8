//! Field-service API Library
//!
//! Service orders (scheduling, the start/complete/cancel workflow, product
//! consumption and stock), plus the reference resources they point at.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), config.stock_policy);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Every route served under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/service-orders",
            handlers::service_orders::service_order_routes(),
        )
        .route(
            "/service-orders-full",
            get(handlers::service_orders::list_service_orders_full),
        )
        .nest("/categories", handlers::resources::category_routes())
        .nest("/roles", handlers::resources::role_routes())
        .nest("/suppliers", handlers::resources::supplier_routes())
        .nest("/clients", handlers::resources::client_routes())
        .nest("/contacts", handlers::resources::contact_routes())
        .nest("/personnel", handlers::resources::personnel_routes())
        .nest("/products", handlers::resources::product_routes())
        .nest("/services", handlers::resources::service_routes())
        .nest("/auth", handlers::auth::auth_router())
}

/// Builds the CORS layer from configuration.
///
/// Explicit origins win; otherwise permissive CORS is only used where
/// [`config::AppConfig::should_allow_permissive_cors`] allows it.
pub fn build_cors_layer(cfg: &config::AppConfig) -> Result<CorsLayer, config::AppConfigError> {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any))
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        Ok(CorsLayer::permissive())
    } else {
        let mut err = validator::ValidationError::new("cors_allowed_origins_required");
        err.message = Some(
            "Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true"
                .into(),
        );
        let mut errors = validator::ValidationErrors::new();
        errors.add("cors_allowed_origins", err);
        Err(config::AppConfigError::Validation(errors))
    }
}

/// Full application router: `/api`, `/health` and the shared layers.
pub fn app_router(state: AppState, cors: CorsLayer) -> Router {
    let db = state.db.clone();

    Router::new()
        .route("/", get(|| async { "fieldservice-api up" }))
        .nest("/api", api_routes())
        .with_state(state)
        .nest("/health", health::health_routes(db))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}
