//! CRUD routes for the reference resources. One set of generic handlers is
//! instantiated per entity; the repository is pulled from `AppState` through
//! `FromRef`.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use sea_orm::{ActiveModelBehavior, ActiveModelTrait, IntoActiveModel, PrimaryKeyTrait};
use serde::{de::DeserializeOwned, Serialize};

use super::common::{ValidJson, ValidPath};
use crate::dto::catalog::{
    CreateCategoryRequest, CreateProductRequest, CreateServiceRequest, UpdateCategoryRequest,
    UpdateProductRequest, UpdateServiceRequest,
};
use crate::dto::parties::{
    CreateClientRequest, CreateContactRequest, CreateSupplierRequest, UpdateClientRequest,
    UpdateContactRequest, UpdateSupplierRequest,
};
use crate::dto::staff::{
    CreatePersonnelRequest, CreateRoleRequest, UpdatePersonnelRequest, UpdateRoleRequest,
};
use crate::entities::{category, client, contact, personnel, product, role, service, supplier};
use crate::errors::ServiceError;
use crate::repositories::{NewRecord, RecordPatch, Repository, Resource};
use crate::services::products::{AvailableProduct, ProductListing};
use crate::AppState;

async fn list<E>(State(repo): State<Repository<E>>) -> Result<Json<Vec<E::Model>>, ServiceError>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Serialize + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    Ok(Json(repo.list().await?))
}

async fn fetch<E>(
    State(repo): State<Repository<E>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<Json<E::Model>, ServiceError>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Serialize + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    Ok(Json(repo.get(id).await?))
}

async fn create<E, C>(
    State(repo): State<Repository<E>>,
    ValidJson(payload): ValidJson<C>,
) -> Result<impl IntoResponse, ServiceError>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Serialize + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    C: NewRecord<E> + DeserializeOwned,
{
    let record = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<E, U>(
    State(repo): State<Repository<E>>,
    ValidPath(id): ValidPath<i32>,
    ValidJson(patch): ValidJson<U>,
) -> Result<Json<E::Model>, ServiceError>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Serialize + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
    U: RecordPatch<E> + DeserializeOwned,
{
    Ok(Json(repo.update(id, patch).await?))
}

async fn remove<E>(
    State(repo): State<Repository<E>>,
    ValidPath(id): ValidPath<i32>,
) -> Result<StatusCode, ServiceError>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Serialize + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<category::Entity>)
                .post(create::<category::Entity, CreateCategoryRequest>),
        )
        .route(
            "/:id",
            get(fetch::<category::Entity>)
                .put(update::<category::Entity, UpdateCategoryRequest>)
                .delete(remove::<category::Entity>),
        )
}

pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<role::Entity>).post(create::<role::Entity, CreateRoleRequest>),
        )
        .route(
            "/:id",
            get(fetch::<role::Entity>)
                .put(update::<role::Entity, UpdateRoleRequest>)
                .delete(remove::<role::Entity>),
        )
}

pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<supplier::Entity>)
                .post(create::<supplier::Entity, CreateSupplierRequest>),
        )
        .route(
            "/:id",
            get(fetch::<supplier::Entity>)
                .put(update::<supplier::Entity, UpdateSupplierRequest>)
                .delete(remove::<supplier::Entity>),
        )
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<client::Entity>).post(create::<client::Entity, CreateClientRequest>),
        )
        .route(
            "/:id",
            get(fetch::<client::Entity>)
                .put(update::<client::Entity, UpdateClientRequest>)
                .delete(remove::<client::Entity>),
        )
}

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<contact::Entity>).post(create::<contact::Entity, CreateContactRequest>),
        )
        .route(
            "/:id",
            get(fetch::<contact::Entity>)
                .put(update::<contact::Entity, UpdateContactRequest>)
                .delete(remove::<contact::Entity>),
        )
}

pub fn personnel_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<personnel::Entity>)
                .post(create::<personnel::Entity, CreatePersonnelRequest>),
        )
        .route(
            "/:id",
            get(fetch::<personnel::Entity>)
                .put(update::<personnel::Entity, UpdatePersonnelRequest>)
                .delete(remove::<personnel::Entity>),
        )
}

pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<service::Entity>).post(create::<service::Entity, CreateServiceRequest>),
        )
        .route(
            "/:id",
            get(fetch::<service::Entity>)
                .put(update::<service::Entity, UpdateServiceRequest>)
                .delete(remove::<service::Entity>),
        )
}

/// Product CRUD plus the supplier-joined and in-stock listings.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list::<product::Entity>).post(create::<product::Entity, CreateProductRequest>),
        )
        .route("/provider", get(products_with_suppliers))
        .route("/available", get(available_products))
        .route(
            "/:id",
            get(fetch::<product::Entity>)
                .put(update::<product::Entity, UpdateProductRequest>)
                .delete(remove::<product::Entity>),
        )
}

async fn products_with_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductListing>>, ServiceError> {
    Ok(Json(state.services.product_catalog.with_suppliers().await?))
}

async fn available_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<AvailableProduct>>, ServiceError> {
    Ok(Json(state.services.product_catalog.available().await?))
}
