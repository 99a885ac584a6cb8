use sea_orm::ActiveValue::{NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use super::{not_blank, patch_field, patch_nullable};
use crate::entities::{client, contact, supplier};
use crate::errors::ServiceError;
use crate::repositories::{NewRecord, RecordPatch};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(required, custom = "not_blank")]
    pub trade_name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub business_type: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub cell_number: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub email: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub country: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub state: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub city: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_cell_phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub billing_name: Option<String>,
    pub billing_number: Option<String>,
    pub billing_address: Option<String>,
    pub notes: Option<String>,
    pub contact_area_or_position: Option<String>,
    pub contact_email: Option<String>,
}

impl NewRecord<supplier::Entity> for CreateSupplierRequest {
    fn into_active_model(self) -> Result<supplier::ActiveModel, ServiceError> {
        Ok(supplier::ActiveModel {
            id: NotSet,
            trade_name: Set(self.trade_name.unwrap_or_default()),
            business_type: Set(self.business_type.unwrap_or_default()),
            cell_number: Set(self.cell_number.unwrap_or_default()),
            email: Set(self.email.unwrap_or_default()),
            country: Set(self.country.unwrap_or_default()),
            state: Set(self.state.unwrap_or_default()),
            city: Set(self.city.unwrap_or_default()),
            contact_name: Set(self.contact_name.unwrap_or_default()),
            contact_cell_phone: Set(self.contact_cell_phone.unwrap_or_default()),
            address: Set(self.address),
            postal_code: Set(self.postal_code),
            website: Set(self.website),
            billing_name: Set(self.billing_name),
            billing_number: Set(self.billing_number),
            billing_address: Set(self.billing_address),
            notes: Set(self.notes),
            contact_area_or_position: Set(self.contact_area_or_position),
            contact_email: Set(self.contact_email),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[validate(custom = "not_blank")]
    pub trade_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub business_type: Option<String>,
    #[validate(custom = "not_blank")]
    pub cell_number: Option<String>,
    #[validate(custom = "not_blank")]
    pub email: Option<String>,
    #[validate(custom = "not_blank")]
    pub country: Option<String>,
    #[validate(custom = "not_blank")]
    pub state: Option<String>,
    #[validate(custom = "not_blank")]
    pub city: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_cell_phone: Option<String>,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub billing_name: Option<String>,
    pub billing_number: Option<String>,
    pub billing_address: Option<String>,
    pub notes: Option<String>,
    pub contact_area_or_position: Option<String>,
    pub contact_email: Option<String>,
}

impl RecordPatch<supplier::Entity> for UpdateSupplierRequest {
    fn is_empty(&self) -> bool {
        [
            &self.trade_name,
            &self.business_type,
            &self.cell_number,
            &self.email,
            &self.country,
            &self.state,
            &self.city,
            &self.contact_name,
            &self.contact_cell_phone,
            &self.address,
            &self.postal_code,
            &self.website,
            &self.billing_name,
            &self.billing_number,
            &self.billing_address,
            &self.notes,
            &self.contact_area_or_position,
            &self.contact_email,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    fn apply(self, model: &mut supplier::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.trade_name, self.trade_name);
        patch_field(&mut model.business_type, self.business_type);
        patch_field(&mut model.cell_number, self.cell_number);
        patch_field(&mut model.email, self.email);
        patch_field(&mut model.country, self.country);
        patch_field(&mut model.state, self.state);
        patch_field(&mut model.city, self.city);
        patch_field(&mut model.contact_name, self.contact_name);
        patch_field(&mut model.contact_cell_phone, self.contact_cell_phone);
        patch_nullable(&mut model.address, self.address);
        patch_nullable(&mut model.postal_code, self.postal_code);
        patch_nullable(&mut model.website, self.website);
        patch_nullable(&mut model.billing_name, self.billing_name);
        patch_nullable(&mut model.billing_number, self.billing_number);
        patch_nullable(&mut model.billing_address, self.billing_address);
        patch_nullable(&mut model.notes, self.notes);
        patch_nullable(
            &mut model.contact_area_or_position,
            self.contact_area_or_position,
        );
        patch_nullable(&mut model.contact_email, self.contact_email);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateClientRequest {
    #[validate(required, custom = "not_blank")]
    pub trade_name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub business_type: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub phone_or_cell: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub email: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub street: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub city: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub country: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub state: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_cell_phone: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub contact_email: Option<String>,
}

impl NewRecord<client::Entity> for CreateClientRequest {
    fn into_active_model(self) -> Result<client::ActiveModel, ServiceError> {
        Ok(client::ActiveModel {
            id: NotSet,
            trade_name: Set(self.trade_name.unwrap_or_default()),
            business_type: Set(self.business_type.unwrap_or_default()),
            phone_or_cell: Set(self.phone_or_cell.unwrap_or_default()),
            email: Set(self.email.unwrap_or_default()),
            street: Set(self.street.unwrap_or_default()),
            number: Set(self.number.unwrap_or_default()),
            neighborhood: Set(self.neighborhood),
            postal_code: Set(self.postal_code),
            city: Set(self.city.unwrap_or_default()),
            country: Set(self.country.unwrap_or_default()),
            state: Set(self.state.unwrap_or_default()),
            contact_name: Set(self.contact_name.unwrap_or_default()),
            contact_cell_phone: Set(self.contact_cell_phone.unwrap_or_default()),
            contact_email: Set(self.contact_email.unwrap_or_default()),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateClientRequest {
    #[validate(custom = "not_blank")]
    pub trade_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub business_type: Option<String>,
    #[validate(custom = "not_blank")]
    pub phone_or_cell: Option<String>,
    #[validate(custom = "not_blank")]
    pub email: Option<String>,
    #[validate(custom = "not_blank")]
    pub street: Option<String>,
    #[validate(custom = "not_blank")]
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    #[validate(custom = "not_blank")]
    pub city: Option<String>,
    #[validate(custom = "not_blank")]
    pub country: Option<String>,
    #[validate(custom = "not_blank")]
    pub state: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_cell_phone: Option<String>,
    #[validate(custom = "not_blank")]
    pub contact_email: Option<String>,
}

impl RecordPatch<client::Entity> for UpdateClientRequest {
    fn is_empty(&self) -> bool {
        [
            &self.trade_name,
            &self.business_type,
            &self.phone_or_cell,
            &self.email,
            &self.street,
            &self.number,
            &self.neighborhood,
            &self.postal_code,
            &self.city,
            &self.country,
            &self.state,
            &self.contact_name,
            &self.contact_cell_phone,
            &self.contact_email,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    fn apply(self, model: &mut client::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.trade_name, self.trade_name);
        patch_field(&mut model.business_type, self.business_type);
        patch_field(&mut model.phone_or_cell, self.phone_or_cell);
        patch_field(&mut model.email, self.email);
        patch_field(&mut model.street, self.street);
        patch_field(&mut model.number, self.number);
        patch_nullable(&mut model.neighborhood, self.neighborhood);
        patch_nullable(&mut model.postal_code, self.postal_code);
        patch_field(&mut model.city, self.city);
        patch_field(&mut model.country, self.country);
        patch_field(&mut model.state, self.state);
        patch_field(&mut model.contact_name, self.contact_name);
        patch_field(&mut model.contact_cell_phone, self.contact_cell_phone);
        patch_field(&mut model.contact_email, self.contact_email);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateContactRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub last_name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub position: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub cell_number: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl NewRecord<contact::Entity> for CreateContactRequest {
    fn into_active_model(self) -> Result<contact::ActiveModel, ServiceError> {
        Ok(contact::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            last_name: Set(self.last_name.unwrap_or_default()),
            position: Set(self.position.unwrap_or_default()),
            cell_number: Set(self.cell_number.unwrap_or_default()),
            email: Set(self.email.unwrap_or_default()),
            phone_number: Set(self.phone_number),
            street: Set(self.street),
            number: Set(self.number),
            neighborhood: Set(self.neighborhood),
            country: Set(self.country),
            state: Set(self.state),
            city: Set(self.city),
            postal_code: Set(self.postal_code),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateContactRequest {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[validate(custom = "not_blank")]
    pub last_name: Option<String>,
    #[validate(custom = "not_blank")]
    pub position: Option<String>,
    #[validate(custom = "not_blank")]
    pub cell_number: Option<String>,
    #[validate(custom = "not_blank")]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub neighborhood: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl RecordPatch<contact::Entity> for UpdateContactRequest {
    fn is_empty(&self) -> bool {
        [
            &self.name,
            &self.last_name,
            &self.position,
            &self.cell_number,
            &self.email,
            &self.phone_number,
            &self.street,
            &self.number,
            &self.neighborhood,
            &self.country,
            &self.state,
            &self.city,
            &self.postal_code,
        ]
        .iter()
        .all(|field| field.is_none())
    }

    fn apply(self, model: &mut contact::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.name, self.name);
        patch_field(&mut model.last_name, self.last_name);
        patch_field(&mut model.position, self.position);
        patch_field(&mut model.cell_number, self.cell_number);
        patch_field(&mut model.email, self.email);
        patch_nullable(&mut model.phone_number, self.phone_number);
        patch_nullable(&mut model.street, self.street);
        patch_nullable(&mut model.number, self.number);
        patch_nullable(&mut model.neighborhood, self.neighborhood);
        patch_nullable(&mut model.country, self.country);
        patch_nullable(&mut model.state, self.state);
        patch_nullable(&mut model.city, self.city);
        patch_nullable(&mut model.postal_code, self.postal_code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_contact_details() {
        let request = CreateClientRequest {
            trade_name: Some("Acme".into()),
            business_type: Some("Retail".into()),
            phone_or_cell: Some("555-0100".into()),
            email: Some("ops@acme.test".into()),
            street: Some("Main".into()),
            number: Some("12".into()),
            city: Some("Monterrey".into()),
            country: Some("MX".into()),
            state: Some("NL".into()),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        let mut fields: Vec<_> = errors.field_errors().keys().copied().collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            vec!["contact_cell_phone", "contact_email", "contact_name"]
        );
    }

    #[test]
    fn supplier_patch_with_only_optional_field_is_not_empty() {
        let patch = UpdateSupplierRequest {
            website: Some("https://parts.test".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert!(UpdateSupplierRequest::default().is_empty());
    }
}
