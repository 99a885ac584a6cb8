use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use validator::Validate;

use super::common::{ValidJson, ValidPath};
use crate::dto::service_order::{
    AddProductsRequest, CancelServiceOrderRequest, CompleteServiceOrderRequest,
    ConfirmServiceOrderRequest, CorrectTimesRequest, CreateServiceOrderRequest,
    ServiceOrderAck, ServiceOrderCreatedResponse, SignServiceOrderRequest,
    StartServiceOrderRequest, TransitionResponse, UpdateServiceOrderRequest,
};
use crate::errors::ServiceError;
use crate::services::service_order_queries::{
    ServiceOrderDetail, ServiceOrderFullView, ServiceOrderSummary,
};
use crate::AppState;

/// Router for `/service-orders`
pub fn service_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_service_orders).post(create_service_order))
        .route(
            "/:id",
            get(get_service_order)
                .put(update_service_order)
                .delete(delete_service_order),
        )
        .route("/:id/start", put(start_service_order))
        .route("/:id/complete", put(complete_service_order))
        .route("/:id/cancel", put(cancel_service_order))
        .route("/:id/confirm", post(confirm_service_order))
        .route("/:id/products", post(add_used_products))
        .route("/:id/sign", put(sign_service_order))
        .route("/:id/times", put(correct_service_order_times))
}

pub async fn list_service_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceOrderSummary>>, ServiceError> {
    Ok(Json(state.services.service_order_queries.list().await?))
}

pub async fn list_service_orders_full(
    State(state): State<AppState>,
) -> Result<Json<Vec<ServiceOrderFullView>>, ServiceError> {
    Ok(Json(state.services.service_order_queries.full_view().await?))
}

pub async fn get_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<ServiceOrderDetail>, ServiceError> {
    Ok(Json(state.services.service_order_queries.detail(id).await?))
}

pub async fn create_service_order(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateServiceOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.service_orders.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ServiceOrderCreatedResponse {
            id: order.id,
            message: "Service order created".to_string(),
        }),
    ))
}

pub async fn update_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<UpdateServiceOrderRequest>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let order = state.services.service_orders.update(id, payload).await?;
    Ok(Json(TransitionResponse::new("Service order updated", order)))
}

pub async fn delete_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
) -> Result<StatusCode, ServiceError> {
    state.services.service_orders.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn start_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<StartServiceOrderRequest>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let order = state
        .services
        .service_orders
        .start(id, payload.start_time.as_deref())
        .await?;
    Ok(Json(TransitionResponse::new("Service order started", order)))
}

pub async fn complete_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<CompleteServiceOrderRequest>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let order = state
        .services
        .service_orders
        .complete(
            id,
            payload.end_time.as_deref(),
            payload.products.unwrap_or_default(),
        )
        .await?;
    Ok(Json(TransitionResponse::new("Service order completed", order)))
}

pub async fn cancel_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<CancelServiceOrderRequest>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let order = state
        .services
        .service_orders
        .cancel(id, payload.cancel_reason)
        .await?;
    Ok(Json(TransitionResponse::new("Service order cancelled", order)))
}

pub async fn confirm_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<ConfirmServiceOrderRequest>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let order = state
        .services
        .service_orders
        .confirm(id, payload.products_used.unwrap_or_default())
        .await?;
    Ok(Json(TransitionResponse::new(
        "Service order confirmed and stock updated",
        order,
    )))
}

pub async fn add_used_products(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<AddProductsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let added = state
        .services
        .service_orders
        .add_used_products(id, payload.products.unwrap_or_default())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ServiceOrderAck {
            message: "Products recorded".to_string(),
            service_order_id: id,
            products_added: Some(added),
        }),
    ))
}

pub async fn sign_service_order(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<SignServiceOrderRequest>,
) -> Result<Json<ServiceOrderAck>, ServiceError> {
    payload.validate()?;
    state.services.service_orders.sign(id, payload.files).await?;
    Ok(Json(ServiceOrderAck {
        message: "Signature stored".to_string(),
        service_order_id: id,
        products_added: None,
    }))
}

/// Administrative override; the resulting state follows the times sent.
pub async fn correct_service_order_times(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(payload): ValidJson<CorrectTimesRequest>,
) -> Result<Json<TransitionResponse>, ServiceError> {
    let order = state
        .services
        .service_orders
        .correct_times(id, payload.start_time.as_deref(), payload.end_time.as_deref())
        .await?;
    Ok(Json(TransitionResponse::new(
        "Service order times corrected",
        order,
    )))
}
