//! Service-order workflow.
//!
//! ```text
//! pending ──start──▶ in_progress ──complete──▶ completed
//!    │                   │
//!    └──────cancel───────┴──────────────────▶ cancelled
//! ```
//!
//! `confirm` shares the completion routine with `complete` and always moves
//! stock. Every multi-statement operation runs in one `DatabaseTransaction`;
//! returning early drops the transaction, which rolls it back.

use chrono::{Local, NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    IntoActiveModel, QueryFilter, QuerySelect, TransactionTrait,
};
use sea_orm::ActiveValue::{NotSet, Set};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::config::StockPolicy;
use crate::dto::service_order::{
    CreateServiceOrderRequest, ProductLine, UpdateServiceOrderRequest,
};
use crate::entities::{
    product, service_order, service_order_personnel, service_order_product, ServiceOrderState,
};
use crate::errors::ServiceError;

const LABEL: &str = "Service order";

static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").unwrap());

/// Parses a strict `HH:MM:SS` wall-clock time.
pub fn parse_time_of_day(field: &str, raw: &str) -> Result<NaiveTime, ServiceError> {
    if !TIME_OF_DAY.is_match(raw) {
        return Err(ServiceError::ValidationError(format!(
            "{} must use the HH:MM:SS format",
            field
        )));
    }
    NaiveTime::parse_from_str(raw, "%H:%M:%S").map_err(|_| {
        ServiceError::ValidationError(format!("{} must use the HH:MM:SS format", field))
    })
}

/// Current local time truncated to whole seconds.
pub fn now_time_of_day() -> NaiveTime {
    let now = Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Uses `raw` when present, otherwise the current local time.
pub fn resolve_time(field: &str, raw: Option<&str>) -> Result<NaiveTime, ServiceError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_time_of_day(field, raw),
        None => Ok(now_time_of_day()),
    }
}

/// Parses an optional time, treating an empty string as absent.
fn optional_time(field: &str, raw: Option<&str>) -> Result<Option<NaiveTime>, ServiceError> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|raw| parse_time_of_day(field, raw))
        .transpose()
}

/// Checks every line before anything is written.
pub fn validate_product_lines(lines: &[ProductLine]) -> Result<(), ServiceError> {
    for (index, line) in lines.iter().enumerate() {
        if line.product_id <= 0 {
            return Err(ServiceError::ValidationError(format!(
                "products[{}]: product_id must be a positive id",
                index
            )));
        }
        if line.quantity_used <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(format!(
                "products[{}]: quantity_used must be greater than 0",
                index
            )));
        }
    }
    Ok(())
}

fn validate_personnel_ids(ids: &[i32]) -> Result<(), ServiceError> {
    if let Some(bad) = ids.iter().find(|id| **id <= 0) {
        return Err(ServiceError::ValidationError(format!(
            "personnel_ids contains an invalid id: {}",
            bad
        )));
    }
    Ok(())
}

fn invalid_state(action: &str, order: &service_order::Model) -> ServiceError {
    ServiceError::InvalidState(format!(
        "Cannot {} service order {}: current state is \"{}\"",
        action, order.id, order.state
    ))
}

/// Deletes every association row of `order_id`, then inserts the new sets.
pub async fn replace_associations(
    txn: &DatabaseTransaction,
    order_id: i32,
    products: &[ProductLine],
    personnel_ids: &[i32],
) -> Result<(), ServiceError> {
    service_order_product::Entity::delete_many()
        .filter(service_order_product::Column::ServiceOrderId.eq(order_id))
        .exec(txn)
        .await
        .map_err(|e| ServiceError::db_error("Failed to clear service order products", e))?;

    service_order_personnel::Entity::delete_many()
        .filter(service_order_personnel::Column::ServiceOrderId.eq(order_id))
        .exec(txn)
        .await
        .map_err(|e| ServiceError::db_error("Failed to clear service order personnel", e))?;

    insert_product_lines(txn, order_id, products).await?;

    if !personnel_ids.is_empty() {
        let rows = personnel_ids
            .iter()
            .map(|personnel_id| service_order_personnel::ActiveModel {
                id: NotSet,
                service_order_id: Set(order_id),
                personnel_id: Set(*personnel_id),
            });
        service_order_personnel::Entity::insert_many(rows)
            .exec(txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to assign personnel", e))?;
    }

    Ok(())
}

async fn insert_product_lines(
    txn: &DatabaseTransaction,
    order_id: i32,
    lines: &[ProductLine],
) -> Result<(), ServiceError> {
    if lines.is_empty() {
        return Ok(());
    }
    let rows = lines.iter().map(|line| service_order_product::ActiveModel {
        id: NotSet,
        service_order_id: Set(order_id),
        product_id: Set(line.product_id),
        quantity_used: Set(line.quantity_used),
    });
    service_order_product::Entity::insert_many(rows)
        .exec(txn)
        .await
        .map_err(|e| ServiceError::db_error("Failed to record service order products", e))?;
    Ok(())
}

/// Loads the order row under an exclusive lock (`SELECT ... FOR UPDATE`).
async fn lock_order(
    txn: &DatabaseTransaction,
    order_id: i32,
) -> Result<service_order::Model, ServiceError> {
    service_order::Entity::find_by_id(order_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| ServiceError::db_error("Failed to load service order", e))?
        .ok_or_else(|| ServiceError::not_found(LABEL, order_id))
}

#[derive(Clone)]
pub struct ServiceOrderService {
    db: Arc<DatabaseConnection>,
    stock_policy: StockPolicy,
}

impl ServiceOrderService {
    pub fn new(db: Arc<DatabaseConnection>, stock_policy: StockPolicy) -> Self {
        Self { db, stock_policy }
    }

    pub fn stock_policy(&self) -> StockPolicy {
        self.stock_policy
    }

    async fn begin(&self) -> Result<DatabaseTransaction, ServiceError> {
        self.db
            .begin()
            .await
            .map_err(|e| ServiceError::db_error("Failed to begin transaction", e))
    }

    async fn commit(txn: DatabaseTransaction) -> Result<(), ServiceError> {
        txn.commit()
            .await
            .map_err(|e| ServiceError::db_error("Failed to commit transaction", e))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, order_id: i32) -> Result<service_order::Model, ServiceError> {
        service_order::Entity::find_by_id(order_id)
            .one(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load service order", e))?
            .ok_or_else(|| ServiceError::not_found(LABEL, order_id))
    }

    /// Creates an order in `pending` together with its associations.
    #[instrument(skip(self, request))]
    pub async fn create(
        &self,
        request: CreateServiceOrderRequest,
    ) -> Result<service_order::Model, ServiceError> {
        request.validate()?;
        let start_time = optional_time("start_time", request.start_time.as_deref())?;
        let end_time = optional_time("end_time", request.end_time.as_deref())?;
        let products = request.products.unwrap_or_default();
        let personnel_ids = request.personnel_ids.unwrap_or_default();
        validate_product_lines(&products)?;
        validate_personnel_ids(&personnel_ids)?;

        let txn = self.begin().await?;

        let order = service_order::ActiveModel {
            id: NotSet,
            client_id: Set(request.client_id.unwrap_or_default()),
            service_id: Set(request.service_id.unwrap_or_default()),
            contact_name: Set(request.contact_name.unwrap_or_default()),
            contact_phone: Set(request.contact_phone.unwrap_or_default()),
            contact_email: Set(request.contact_email.unwrap_or_default()),
            scheduled_date: Set(request.scheduled_date.unwrap_or_default()),
            start_time: Set(start_time),
            end_time: Set(end_time),
            price: Set(request.price.unwrap_or_default()),
            activities: Set(request.activities.unwrap_or_default()),
            recommendations: Set(request.recommendations),
            files: Set(request.files),
            state: Set(ServiceOrderState::Pending),
            cancel_reason: Set(None),
            created_at: NotSet,
            updated_at: NotSet,
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::db_error("Failed to create service order", e))?;

        replace_associations(&txn, order.id, &products, &personnel_ids).await?;
        Self::commit(txn).await?;

        info!(
            order_id = order.id,
            products = products.len(),
            personnel = personnel_ids.len(),
            "Service order created"
        );
        Ok(order)
    }

    /// General update: writes the allow-listed fields and fully replaces the
    /// product and personnel associations.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        order_id: i32,
        request: UpdateServiceOrderRequest,
    ) -> Result<service_order::Model, ServiceError> {
        if request.is_empty() {
            return Err(ServiceError::ValidationError(
                "No valid fields were sent for update".to_string(),
            ));
        }
        request.validate()?;

        // Some("") clears a time, None leaves it untouched.
        let start_time = request
            .start_time
            .as_deref()
            .map(|raw| optional_time("start_time", Some(raw)))
            .transpose()?;
        let end_time = request
            .end_time
            .as_deref()
            .map(|raw| optional_time("end_time", Some(raw)))
            .transpose()?;
        let products = request.products.unwrap_or_default();
        let personnel_ids = request.personnel_ids.unwrap_or_default();
        validate_product_lines(&products)?;
        validate_personnel_ids(&personnel_ids)?;

        let txn = self.begin().await?;
        let existing = lock_order(&txn, order_id).await?;

        let mut active = existing.into_active_model();
        if let Some(client_id) = request.client_id {
            active.client_id = Set(client_id);
        }
        if let Some(service_id) = request.service_id {
            active.service_id = Set(service_id);
        }
        if let Some(contact_name) = request.contact_name {
            active.contact_name = Set(contact_name);
        }
        if let Some(contact_phone) = request.contact_phone {
            active.contact_phone = Set(contact_phone);
        }
        if let Some(contact_email) = request.contact_email {
            active.contact_email = Set(contact_email);
        }
        if let Some(scheduled_date) = request.scheduled_date {
            active.scheduled_date = Set(scheduled_date);
        }
        if let Some(start_time) = start_time {
            active.start_time = Set(start_time);
        }
        if let Some(end_time) = end_time {
            active.end_time = Set(end_time);
        }
        if let Some(price) = request.price {
            active.price = Set(price);
        }
        if let Some(activities) = request.activities {
            active.activities = Set(activities);
        }
        if let Some(recommendations) = request.recommendations {
            active.recommendations = Set(Some(recommendations));
        }
        if let Some(files) = request.files {
            active.files = Set(Some(files));
        }
        if let Some(cancel_reason) = request.cancel_reason {
            active.cancel_reason = Set(Some(cancel_reason));
        }

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to update service order", e))?;

        replace_associations(&txn, order_id, &products, &personnel_ids).await?;
        Self::commit(txn).await?;

        info!(
            order_id,
            products = products.len(),
            personnel = personnel_ids.len(),
            "Service order updated"
        );
        Ok(updated)
    }

    /// Deletes an order and its association rows.
    #[instrument(skip(self))]
    pub async fn delete(&self, order_id: i32) -> Result<(), ServiceError> {
        let txn = self.begin().await?;
        lock_order(&txn, order_id).await?;

        replace_associations(&txn, order_id, &[], &[]).await?;
        service_order::Entity::delete_by_id(order_id)
            .exec(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to delete service order", e))?;

        Self::commit(txn).await?;
        info!(order_id, "Service order deleted");
        Ok(())
    }

    /// `pending` → `in_progress`.
    #[instrument(skip(self))]
    pub async fn start(
        &self,
        order_id: i32,
        start_time: Option<&str>,
    ) -> Result<service_order::Model, ServiceError> {
        let start_time = resolve_time("start_time", start_time)?;

        let txn = self.begin().await?;
        let order = lock_order(&txn, order_id).await?;
        if order.state != ServiceOrderState::Pending {
            return Err(invalid_state("start", &order));
        }

        let mut active = order.into_active_model();
        active.start_time = Set(Some(start_time));
        active.state = Set(ServiceOrderState::InProgress);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to start service order", e))?;

        Self::commit(txn).await?;
        info!(order_id, start_time = %start_time, "Service order started");
        Ok(updated)
    }

    /// `in_progress` → `completed`, appending the consumed products.
    #[instrument(skip(self, products))]
    pub async fn complete(
        &self,
        order_id: i32,
        end_time: Option<&str>,
        products: Vec<ProductLine>,
    ) -> Result<service_order::Model, ServiceError> {
        let end_time = resolve_time("end_time", end_time)?;
        validate_product_lines(&products)?;

        let txn = self.begin().await?;
        let order = lock_order(&txn, order_id).await?;
        if order.state != ServiceOrderState::InProgress {
            return Err(invalid_state("complete", &order));
        }

        let updated = self
            .finish(
                &txn,
                order,
                end_time,
                &products,
                self.stock_policy.decrements_on_complete(),
            )
            .await?;

        Self::commit(txn).await?;
        info!(order_id, end_time = %end_time, lines = products.len(), "Service order completed");
        Ok(updated)
    }

    /// Stock-confirming completion, legal from `pending` or `in_progress`.
    /// Always decrements stock and stamps the end time with the current time.
    #[instrument(skip(self, products))]
    pub async fn confirm(
        &self,
        order_id: i32,
        products: Vec<ProductLine>,
    ) -> Result<service_order::Model, ServiceError> {
        validate_product_lines(&products)?;

        let txn = self.begin().await?;
        let order = lock_order(&txn, order_id).await?;
        if order.state.is_terminal() {
            return Err(invalid_state("confirm", &order));
        }

        let updated = self
            .finish(&txn, order, now_time_of_day(), &products, true)
            .await?;

        Self::commit(txn).await?;
        info!(order_id, lines = products.len(), "Service order confirmed and stock updated");
        Ok(updated)
    }

    /// Shared completion routine for `complete` and `confirm`.
    async fn finish(
        &self,
        txn: &DatabaseTransaction,
        order: service_order::Model,
        end_time: NaiveTime,
        products: &[ProductLine],
        decrement_stock: bool,
    ) -> Result<service_order::Model, ServiceError> {
        if decrement_stock {
            decrement_stock_for(txn, order.id, products).await?;
        }
        insert_product_lines(txn, order.id, products).await?;

        let mut active = order.into_active_model();
        active.end_time = Set(Some(end_time));
        active.state = Set(ServiceOrderState::Completed);
        active
            .update(txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to complete service order", e))
    }

    /// `pending`/`in_progress` → `cancelled`. Times are left untouched.
    #[instrument(skip(self))]
    pub async fn cancel(
        &self,
        order_id: i32,
        reason: Option<String>,
    ) -> Result<service_order::Model, ServiceError> {
        let txn = self.begin().await?;
        let order = lock_order(&txn, order_id).await?;
        if order.state.is_terminal() {
            return Err(invalid_state("cancel", &order));
        }

        let reason = reason.filter(|r| !r.trim().is_empty());
        let mut active = order.into_active_model();
        active.state = Set(ServiceOrderState::Cancelled);
        active.cancel_reason = Set(reason);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to cancel service order", e))?;

        Self::commit(txn).await?;
        info!(order_id, "Service order cancelled");
        Ok(updated)
    }

    /// Administrative override of the recorded times.
    ///
    /// The resulting state is derived from the fields sent: start only puts the
    /// order in progress, start and end complete it, anything else keeps the
    /// current state.
    #[instrument(skip(self))]
    pub async fn correct_times(
        &self,
        order_id: i32,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<service_order::Model, ServiceError> {
        let start_time = optional_time("start_time", start_time)?;
        let end_time = optional_time("end_time", end_time)?;

        let txn = self.begin().await?;
        let order = lock_order(&txn, order_id).await?;

        let previous = order.state;
        let next = match (start_time.is_some(), end_time.is_some()) {
            (true, false) => ServiceOrderState::InProgress,
            (true, true) => ServiceOrderState::Completed,
            _ => previous,
        };

        let mut active = order.into_active_model();
        if let Some(start_time) = start_time {
            active.start_time = Set(Some(start_time));
        }
        if let Some(end_time) = end_time {
            active.end_time = Set(Some(end_time));
        }
        active.state = Set(next);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to correct service order times", e))?;

        Self::commit(txn).await?;
        warn!(
            order_id,
            from = %previous,
            to = %next,
            "Service order times corrected by administrative override"
        );
        Ok(updated)
    }

    /// Appends consumed products outside a transition. All lines or none.
    #[instrument(skip(self, products))]
    pub async fn add_used_products(
        &self,
        order_id: i32,
        products: Vec<ProductLine>,
    ) -> Result<usize, ServiceError> {
        if products.is_empty() {
            return Err(ServiceError::ValidationError(
                "products must be a non-empty list".to_string(),
            ));
        }
        validate_product_lines(&products)?;

        let txn = self.begin().await?;
        let order = lock_order(&txn, order_id).await?;
        if order.state == ServiceOrderState::Cancelled {
            return Err(invalid_state("add products to", &order));
        }

        insert_product_lines(&txn, order_id, &products).await?;
        Self::commit(txn).await?;

        info!(order_id, lines = products.len(), "Used products recorded");
        Ok(products.len())
    }

    /// Stores the signature / attachment reference.
    #[instrument(skip(self, files))]
    pub async fn sign(
        &self,
        order_id: i32,
        files: Option<String>,
    ) -> Result<service_order::Model, ServiceError> {
        let files = files
            .filter(|f| !f.trim().is_empty())
            .ok_or_else(|| ServiceError::ValidationError("files is required".to_string()))?;

        let order = self.get(order_id).await?;
        let mut active = order.into_active_model();
        active.files = Set(Some(files));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to store service order signature", e))?;

        info!(order_id, "Service order signed");
        Ok(updated)
    }
}

/// Read-compute-write stock decrement for every product on the order.
/// Repeated product ids are summed first. Unknown products abort the whole
/// operation before any stock is written.
async fn decrement_stock_for(
    txn: &DatabaseTransaction,
    order_id: i32,
    lines: &[ProductLine],
) -> Result<(), ServiceError> {
    let mut totals: BTreeMap<i32, Decimal> = BTreeMap::new();
    for line in lines {
        *totals.entry(line.product_id).or_insert(Decimal::ZERO) += line.quantity_used;
    }

    let mut loaded = Vec::with_capacity(totals.len());
    for (product_id, quantity) in totals {
        let product = product::Entity::find_by_id(product_id)
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load product", e))?
            .ok_or_else(|| ServiceError::not_found("Product", product_id))?;
        loaded.push((product, quantity));
    }

    for (product, quantity) in loaded {
        let remaining = product.stock - quantity;
        let minimum = product.minimum_stock;
        let product_id = product.id;

        let mut active = product.into_active_model();
        active.stock = Set(remaining);
        active
            .update(txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to update product stock", e))?;

        if remaining <= minimum {
            warn!(
                order_id,
                product_id,
                stock = %remaining,
                minimum_stock = %minimum,
                "Product stock at or below minimum"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("00:00:00")]
    #[case("09:05:59")]
    #[case("14:30:00")]
    #[case("23:59:59")]
    fn accepts_well_formed_times(#[case] raw: &str) {
        let parsed = parse_time_of_day("start_time", raw).unwrap();
        assert_eq!(parsed.format("%H:%M:%S").to_string(), raw);
    }

    #[rstest]
    #[case("25:99")]
    #[case("24:00:00")]
    #[case("9:05:00")]
    #[case("12:60:00")]
    #[case("12:00")]
    #[case("12:00:00.5")]
    #[case("noon")]
    fn rejects_malformed_times(#[case] raw: &str) {
        assert_matches!(
            parse_time_of_day("end_time", raw),
            Err(ServiceError::ValidationError(msg)) if msg.contains("end_time")
        );
    }

    #[test]
    fn missing_time_resolves_to_now_without_fraction() {
        let before = now_time_of_day();
        let resolved = resolve_time("start_time", None).unwrap();
        assert_eq!(resolved.nanosecond(), 0);
        assert!(resolved >= before || before.hour() == 23);

        let blank = resolve_time("start_time", Some("  ")).unwrap();
        assert_eq!(blank.nanosecond(), 0);
    }

    #[test]
    fn product_lines_need_positive_quantities() {
        let ok = vec![ProductLine {
            product_id: 7,
            quantity_used: dec!(3),
        }];
        assert!(validate_product_lines(&ok).is_ok());

        let negative = vec![
            ProductLine {
                product_id: 7,
                quantity_used: dec!(3),
            },
            ProductLine {
                product_id: 8,
                quantity_used: dec!(-1),
            },
        ];
        assert_matches!(
            validate_product_lines(&negative),
            Err(ServiceError::ValidationError(msg)) if msg.starts_with("products[1]")
        );

        let zero_id = vec![ProductLine {
            product_id: 0,
            quantity_used: dec!(1),
        }];
        assert!(validate_product_lines(&zero_id).is_err());
    }

    #[test]
    fn empty_time_is_absent_for_optional_fields() {
        assert_eq!(optional_time("end_time", Some("")).unwrap(), None);
        assert_eq!(optional_time("end_time", None).unwrap(), None);
        assert!(optional_time("end_time", Some("7pm")).is_err());
    }
}
