use rust_decimal::Decimal;
use sea_orm::ActiveValue::{NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use super::{non_negative, not_blank, patch_field, patch_nullable};
use crate::entities::{category, product, service};
use crate::errors::ServiceError;
use crate::repositories::{NewRecord, RecordPatch};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub unit: Option<String>,
}

impl NewRecord<category::Entity> for CreateCategoryRequest {
    fn into_active_model(self) -> Result<category::ActiveModel, ServiceError> {
        Ok(category::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            unit: Set(self.unit.unwrap_or_default()),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[validate(custom = "not_blank")]
    pub unit: Option<String>,
}

impl RecordPatch<category::Entity> for UpdateCategoryRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.unit.is_none()
    }

    fn apply(self, model: &mut category::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.name, self.name);
        patch_field(&mut model.unit, self.unit);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    #[validate(required)]
    pub category_id: Option<i32>,
    #[validate(required, custom = "not_blank")]
    pub description: Option<String>,
    #[validate(required, custom = "non_negative")]
    pub sale_price: Option<Decimal>,
    pub model: Option<String>,
    pub factory_code: Option<String>,
    #[validate(required)]
    pub supplier_id: Option<i32>,
    #[validate(required, custom = "not_blank")]
    pub manufacturer_brand: Option<String>,
    #[validate(required, custom = "non_negative")]
    pub initial_stock: Option<Decimal>,
    #[validate(required, custom = "non_negative")]
    pub minimum_stock: Option<Decimal>,
    pub product_image: Option<String>,
}

impl NewRecord<product::Entity> for CreateProductRequest {
    fn into_active_model(self) -> Result<product::ActiveModel, ServiceError> {
        let initial_stock = self.initial_stock.unwrap_or_default();
        Ok(product::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            category_id: Set(self.category_id.unwrap_or_default()),
            description: Set(self.description.unwrap_or_default()),
            sale_price: Set(self.sale_price.unwrap_or_default()),
            model: Set(self.model),
            factory_code: Set(self.factory_code),
            supplier_id: Set(self.supplier_id.unwrap_or_default()),
            manufacturer_brand: Set(self.manufacturer_brand.unwrap_or_default()),
            initial_stock: Set(initial_stock),
            minimum_stock: Set(self.minimum_stock.unwrap_or_default()),
            stock: Set(initial_stock),
            product_image: Set(self.product_image),
        })
    }
}

/// Product update. `stock` is deliberately absent: only service orders move it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    pub category_id: Option<i32>,
    #[validate(custom = "not_blank")]
    pub description: Option<String>,
    #[validate(custom = "non_negative")]
    pub sale_price: Option<Decimal>,
    pub model: Option<String>,
    pub factory_code: Option<String>,
    pub supplier_id: Option<i32>,
    #[validate(custom = "not_blank")]
    pub manufacturer_brand: Option<String>,
    #[validate(custom = "non_negative")]
    pub initial_stock: Option<Decimal>,
    #[validate(custom = "non_negative")]
    pub minimum_stock: Option<Decimal>,
    pub product_image: Option<String>,
}

impl RecordPatch<product::Entity> for UpdateProductRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category_id.is_none()
            && self.description.is_none()
            && self.sale_price.is_none()
            && self.model.is_none()
            && self.factory_code.is_none()
            && self.supplier_id.is_none()
            && self.manufacturer_brand.is_none()
            && self.initial_stock.is_none()
            && self.minimum_stock.is_none()
            && self.product_image.is_none()
    }

    fn apply(self, model: &mut product::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.name, self.name);
        patch_field(&mut model.category_id, self.category_id);
        patch_field(&mut model.description, self.description);
        patch_field(&mut model.sale_price, self.sale_price);
        patch_nullable(&mut model.model, self.model);
        patch_nullable(&mut model.factory_code, self.factory_code);
        patch_field(&mut model.supplier_id, self.supplier_id);
        patch_field(&mut model.manufacturer_brand, self.manufacturer_brand);
        patch_field(&mut model.initial_stock, self.initial_stock);
        patch_field(&mut model.minimum_stock, self.minimum_stock);
        patch_nullable(&mut model.product_image, self.product_image);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateServiceRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    #[validate(required)]
    pub category_id: Option<i32>,
    #[validate(required, custom = "non_negative")]
    pub sale_price: Option<Decimal>,
    #[validate(required, custom = "not_blank")]
    pub description: Option<String>,
    pub sat_unit: Option<String>,
    pub sat_code: Option<String>,
}

impl NewRecord<service::Entity> for CreateServiceRequest {
    fn into_active_model(self) -> Result<service::ActiveModel, ServiceError> {
        Ok(service::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            category_id: Set(self.category_id.unwrap_or_default()),
            sale_price: Set(self.sale_price.unwrap_or_default()),
            description: Set(self.description.unwrap_or_default()),
            sat_unit: Set(self.sat_unit),
            sat_code: Set(self.sat_code),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateServiceRequest {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    pub category_id: Option<i32>,
    #[validate(custom = "non_negative")]
    pub sale_price: Option<Decimal>,
    #[validate(custom = "not_blank")]
    pub description: Option<String>,
    pub sat_unit: Option<String>,
    pub sat_code: Option<String>,
}

impl RecordPatch<service::Entity> for UpdateServiceRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category_id.is_none()
            && self.sale_price.is_none()
            && self.description.is_none()
            && self.sat_unit.is_none()
            && self.sat_code.is_none()
    }

    fn apply(self, model: &mut service::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.name, self.name);
        patch_field(&mut model.category_id, self.category_id);
        patch_field(&mut model.sale_price, self.sale_price);
        patch_field(&mut model.description, self.description);
        patch_nullable(&mut model.sat_unit, self.sat_unit);
        patch_nullable(&mut model.sat_code, self.sat_code);
        Ok(())
    }
}
