//! Read models for service orders: listing, detail and the full export view.

use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::entities::{
    category, client, personnel, product, service, service_order, service_order_personnel,
    service_order_product,
};
use crate::errors::ServiceError;

/// One consumed product on an order, with the product's name and unit.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct OrderProductLine {
    #[serde(skip_serializing)]
    pub service_order_id: i32,
    pub product_id: i32,
    pub product_name: Option<String>,
    pub product_unit: Option<String>,
    pub quantity_used: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignedPersonnel {
    pub id: i32,
    pub full_name: String,
}

/// Row of `GET /service-orders`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOrderSummary {
    #[serde(flatten)]
    pub order: service_order::Model,
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    /// Assigned personnel full names joined with ", "
    pub personnel: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceOrderDetail {
    #[serde(flatten)]
    pub order: service_order::Model,
    pub client_name: Option<String>,
    pub service_name: Option<String>,
    pub products: Vec<OrderProductLine>,
    pub personnel: Vec<AssignedPersonnel>,
}

/// Row of `GET /service-orders-full`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOrderFullView {
    #[serde(flatten)]
    pub order: service_order::Model,
    pub client: Option<client::Model>,
    pub service: Option<service::Model>,
    pub products: Vec<OrderProductLine>,
}

#[derive(Clone)]
pub struct ServiceOrderQueries {
    db: Arc<DatabaseConnection>,
}

impl ServiceOrderQueries {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Orders with the newest scheduled date first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ServiceOrderSummary>, ServiceError> {
        let orders = service_order::Entity::find()
            .order_by_desc(service_order::Column::ScheduledDate)
            .order_by_desc(service_order::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to list service orders", e))?;

        let client_names = self.client_names().await?;
        let service_names = self.service_names().await?;
        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let mut personnel = self.personnel_for(&ids).await?;

        Ok(orders
            .into_iter()
            .map(|order| {
                let names = personnel
                    .remove(&order.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|p| p.full_name)
                    .collect::<Vec<_>>()
                    .join(", ");
                ServiceOrderSummary {
                    client_name: client_names.get(&order.client_id).cloned(),
                    service_name: service_names.get(&order.service_id).cloned(),
                    personnel: names,
                    order,
                }
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn detail(&self, order_id: i32) -> Result<ServiceOrderDetail, ServiceError> {
        let (order, client) = service_order::Entity::find_by_id(order_id)
            .find_also_related(client::Entity)
            .one(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load service order", e))?
            .ok_or_else(|| ServiceError::not_found("Service order", order_id))?;

        let service = service::Entity::find_by_id(order.service_id)
            .one(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load service", e))?;

        let products = self.product_lines(Some(&[order_id][..])).await?;
        let personnel = self
            .personnel_for(&[order_id])
            .await?
            .remove(&order_id)
            .unwrap_or_default();

        Ok(ServiceOrderDetail {
            client_name: client.map(|c| c.trade_name),
            service_name: service.map(|s| s.name),
            products,
            personnel,
            order,
        })
    }

    /// Every order with client and service records and product lines, newest id first.
    #[instrument(skip(self))]
    pub async fn full_view(&self) -> Result<Vec<ServiceOrderFullView>, ServiceError> {
        let orders = service_order::Entity::find()
            .order_by_desc(service_order::Column::Id)
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to list service orders", e))?;

        let clients: HashMap<i32, client::Model> = client::Entity::find()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load clients", e))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let services: HashMap<i32, service::Model> = service::Entity::find()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load services", e))?
            .into_iter()
            .map(|s| (s.id, s))
            .collect();

        let mut lines: HashMap<i32, Vec<OrderProductLine>> = HashMap::new();
        for line in self.product_lines(None).await? {
            lines.entry(line.service_order_id).or_default().push(line);
        }

        Ok(orders
            .into_iter()
            .map(|order| ServiceOrderFullView {
                client: clients.get(&order.client_id).cloned(),
                service: services.get(&order.service_id).cloned(),
                products: lines.remove(&order.id).unwrap_or_default(),
                order,
            })
            .collect())
    }

    async fn client_names(&self) -> Result<HashMap<i32, String>, ServiceError> {
        let rows: Vec<(i32, String)> = client::Entity::find()
            .select_only()
            .columns([client::Column::Id, client::Column::TradeName])
            .into_tuple()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load client names", e))?;
        Ok(rows.into_iter().collect())
    }

    async fn service_names(&self) -> Result<HashMap<i32, String>, ServiceError> {
        let rows: Vec<(i32, String)> = service::Entity::find()
            .select_only()
            .columns([service::Column::Id, service::Column::Name])
            .into_tuple()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load service names", e))?;
        Ok(rows.into_iter().collect())
    }

    /// Product lines for the given orders, or for all orders when `None`.
    async fn product_lines(
        &self,
        order_ids: Option<&[i32]>,
    ) -> Result<Vec<OrderProductLine>, ServiceError> {
        let mut query = service_order_product::Entity::find()
            .select_only()
            .columns([
                service_order_product::Column::ServiceOrderId,
                service_order_product::Column::ProductId,
                service_order_product::Column::QuantityUsed,
            ])
            .column_as(product::Column::Name, "product_name")
            .column_as(category::Column::Unit, "product_unit")
            .join(
                JoinType::LeftJoin,
                service_order_product::Relation::Product.def(),
            )
            .join(JoinType::LeftJoin, product::Relation::Category.def())
            .order_by_asc(service_order_product::Column::Id);

        if let Some(ids) = order_ids {
            query = query.filter(
                service_order_product::Column::ServiceOrderId.is_in(ids.iter().copied()),
            );
        }

        query
            .into_model::<OrderProductLine>()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load service order products", e))
    }

    async fn personnel_for(
        &self,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<AssignedPersonnel>>, ServiceError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, i32, String, String)> = service_order_personnel::Entity::find()
            .select_only()
            .columns([
                service_order_personnel::Column::ServiceOrderId,
                service_order_personnel::Column::PersonnelId,
            ])
            .column(personnel::Column::Name)
            .column(personnel::Column::LastName)
            .join(
                JoinType::InnerJoin,
                service_order_personnel::Relation::Personnel.def(),
            )
            .filter(service_order_personnel::Column::ServiceOrderId.is_in(order_ids.iter().copied()))
            .order_by_asc(service_order_personnel::Column::Id)
            .into_tuple()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to load assigned personnel", e))?;

        let mut grouped: HashMap<i32, Vec<AssignedPersonnel>> = HashMap::new();
        for (order_id, personnel_id, name, last_name) in rows {
            grouped.entry(order_id).or_default().push(AssignedPersonnel {
                id: personnel_id,
                full_name: format!("{} {}", name, last_name),
            });
        }
        Ok(grouped)
    }
}
