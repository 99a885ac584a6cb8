use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{non_negative, not_blank};
use crate::entities::service_order;

/// One consumed product on a service order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLine {
    pub product_id: i32,
    pub quantity_used: Decimal,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateServiceOrderRequest {
    #[validate(required)]
    pub client_id: Option<i32>,
    #[validate(required)]
    pub service_id: Option<i32>,
    #[validate(required, custom = "not_blank")]
    pub contact_name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_phone: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_email: Option<String>,
    #[validate(required)]
    pub scheduled_date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[validate(required, custom = "non_negative")]
    pub price: Option<Decimal>,
    #[validate(required, custom = "not_blank")]
    pub activities: Option<String>,
    #[serde(alias = "recomendations")]
    pub recommendations: Option<String>,
    pub files: Option<String>,
    pub products: Option<Vec<ProductLine>>,
    #[serde(alias = "personal_ids")]
    pub personnel_ids: Option<Vec<i32>>,
}

/// General order update. `state` is not writable here; it only moves through
/// the workflow transitions or the time correction override.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateServiceOrderRequest {
    pub client_id: Option<i32>,
    pub service_id: Option<i32>,
    #[validate(custom = "not_blank")]
    pub contact_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_phone: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_email: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    /// `""` clears the stored time.
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    #[validate(custom = "non_negative")]
    pub price: Option<Decimal>,
    #[validate(custom = "not_blank")]
    pub activities: Option<String>,
    #[serde(alias = "recomendations")]
    pub recommendations: Option<String>,
    pub files: Option<String>,
    pub cancel_reason: Option<String>,
    pub products: Option<Vec<ProductLine>>,
    #[serde(alias = "personal_ids")]
    pub personnel_ids: Option<Vec<i32>>,
}

impl UpdateServiceOrderRequest {
    pub fn is_empty(&self) -> bool {
        self.client_id.is_none()
            && self.service_id.is_none()
            && self.scheduled_date.is_none()
            && self.price.is_none()
            && self.products.is_none()
            && self.personnel_ids.is_none()
            && [
                &self.contact_name,
                &self.contact_phone,
                &self.contact_email,
                &self.start_time,
                &self.end_time,
                &self.activities,
                &self.recommendations,
                &self.files,
                &self.cancel_reason,
            ]
            .iter()
            .all(|field| field.is_none())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StartServiceOrderRequest {
    pub start_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteServiceOrderRequest {
    pub end_time: Option<String>,
    pub products: Option<Vec<ProductLine>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CancelServiceOrderRequest {
    #[serde(alias = "reason")]
    pub cancel_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CorrectTimesRequest {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddProductsRequest {
    pub products: Option<Vec<ProductLine>>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct SignServiceOrderRequest {
    /// Base64 signature or stored file path
    #[validate(required, custom = "not_blank")]
    pub files: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmServiceOrderRequest {
    #[serde(alias = "products")]
    pub products_used: Option<Vec<ProductLine>>,
}

/// Body returned by every workflow transition.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub message: String,
    pub service_order: service_order::Model,
}

impl TransitionResponse {
    pub fn new(message: impl Into<String>, service_order: service_order::Model) -> Self {
        Self {
            message: message.into(),
            service_order,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceOrderCreatedResponse {
    pub id: i32,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceOrderAck {
    pub message: String,
    pub service_order_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products_added: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_field_names_are_accepted() {
        let request: CreateServiceOrderRequest = serde_json::from_value(serde_json::json!({
            "client_id": 1,
            "service_id": 2,
            "contact_name": "Luis",
            "contact_phone": "555-0110",
            "contact_email": "luis@client.test",
            "scheduled_date": "2024-05-02",
            "price": 1500,
            "activities": "Install access point",
            "recomendations": "Replace rack fan",
            "personal_ids": [3, 4],
            "products": [{"product_id": 1, "quantity_used": 2}]
        }))
        .unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.recommendations.as_deref(), Some("Replace rack fan"));
        assert_eq!(request.personnel_ids, Some(vec![3, 4]));
        assert_eq!(
            request.products.unwrap()[0].quantity_used,
            Decimal::from(2)
        );
    }

    #[test]
    fn update_ignores_state_and_detects_empty_body() {
        let request: UpdateServiceOrderRequest =
            serde_json::from_value(serde_json::json!({ "state": "completed" })).unwrap();
        assert!(request.is_empty());

        let request: UpdateServiceOrderRequest =
            serde_json::from_value(serde_json::json!({ "products": [] })).unwrap();
        assert!(!request.is_empty());
    }

    #[test]
    fn sign_requires_files() {
        assert!(SignServiceOrderRequest::default().validate().is_err());
        let request = SignServiceOrderRequest {
            files: Some("data:image/png;base64,AAAA".into()),
        };
        assert!(request.validate().is_ok());
    }
}
