use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::entities::{category, product, supplier};
use crate::errors::ServiceError;

/// Product row joined with its category and supplier names.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct ProductListing {
    pub id: i32,
    pub name: String,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub unit: Option<String>,
    pub description: String,
    pub sale_price: Decimal,
    pub model: Option<String>,
    pub factory_code: Option<String>,
    pub supplier_id: i32,
    pub supplier_name: Option<String>,
    pub manufacturer_brand: String,
    pub initial_stock: Decimal,
    pub minimum_stock: Decimal,
    pub stock: Decimal,
    pub product_image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailableProduct {
    #[serde(flatten)]
    pub product: ProductListing,
    /// Stock is at or below the configured minimum
    pub low_stock: bool,
}

impl From<ProductListing> for AvailableProduct {
    fn from(product: ProductListing) -> Self {
        let low_stock = product.stock <= product.minimum_stock;
        Self { product, low_stock }
    }
}

#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DatabaseConnection>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn listing_query() -> Select<product::Entity> {
        product::Entity::find()
            .select_only()
            .columns([
                product::Column::Id,
                product::Column::Name,
                product::Column::CategoryId,
                product::Column::Description,
                product::Column::SalePrice,
                product::Column::Model,
                product::Column::FactoryCode,
                product::Column::SupplierId,
                product::Column::ManufacturerBrand,
                product::Column::InitialStock,
                product::Column::MinimumStock,
                product::Column::Stock,
                product::Column::ProductImage,
            ])
            .column_as(category::Column::Name, "category_name")
            .column_as(category::Column::Unit, "unit")
            .column_as(supplier::Column::TradeName, "supplier_name")
            .join(JoinType::LeftJoin, product::Relation::Category.def())
            .join(JoinType::LeftJoin, product::Relation::Supplier.def())
            .order_by_asc(product::Column::Name)
    }

    /// All products with supplier trade name and category name/unit.
    #[instrument(skip(self))]
    pub async fn with_suppliers(&self) -> Result<Vec<ProductListing>, ServiceError> {
        Self::listing_query()
            .into_model::<ProductListing>()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to list products with suppliers", e))
    }

    /// Products that still have stock on hand.
    #[instrument(skip(self))]
    pub async fn available(&self) -> Result<Vec<AvailableProduct>, ServiceError> {
        let rows = Self::listing_query()
            .filter(product::Column::Stock.gt(Decimal::ZERO))
            .into_model::<ProductListing>()
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to list available products", e))?;

        Ok(rows.into_iter().map(AvailableProduct::from).collect())
    }
}
