use sea_orm::ActiveValue::{NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use super::{not_blank, patch_field, patch_nullable};
use crate::entities::{personnel, role};
use crate::errors::ServiceError;
use crate::repositories::{NewRecord, RecordPatch};
use crate::services::auth::hash_password;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateRoleRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl NewRecord<role::Entity> for CreateRoleRequest {
    fn into_active_model(self) -> Result<role::ActiveModel, ServiceError> {
        Ok(role::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            description: Set(self.description),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    pub description: Option<String>,
}

impl RecordPatch<role::Entity> for UpdateRoleRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }

    fn apply(self, model: &mut role::ActiveModel) -> Result<(), ServiceError> {
        patch_field(&mut model.name, self.name);
        patch_nullable(&mut model.description, self.description);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreatePersonnelRequest {
    #[validate(required, custom = "not_blank")]
    pub name: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub last_name: Option<String>,
    #[validate(required)]
    pub role_id: Option<i32>,
    #[validate(required, custom = "not_blank")]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub cell_number: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub country: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub state: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub city: Option<String>,
    #[validate(required, custom = "not_blank")]
    pub address: Option<String>,
    /// Plain-text password; only its hash is stored.
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

impl NewRecord<personnel::Entity> for CreatePersonnelRequest {
    fn into_active_model(self) -> Result<personnel::ActiveModel, ServiceError> {
        let password_hash = self.password.as_deref().map(hash_password).transpose()?;
        Ok(personnel::ActiveModel {
            id: NotSet,
            name: Set(self.name.unwrap_or_default()),
            last_name: Set(self.last_name.unwrap_or_default()),
            role_id: Set(self.role_id.unwrap_or_default()),
            email: Set(self.email.unwrap_or_default()),
            phone: Set(self.phone),
            cell_number: Set(self.cell_number.unwrap_or_default()),
            country: Set(self.country.unwrap_or_default()),
            state: Set(self.state.unwrap_or_default()),
            city: Set(self.city.unwrap_or_default()),
            address: Set(self.address.unwrap_or_default()),
            password_hash: Set(password_hash),
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdatePersonnelRequest {
    #[validate(custom = "not_blank")]
    pub name: Option<String>,
    #[validate(custom = "not_blank")]
    pub last_name: Option<String>,
    pub role_id: Option<i32>,
    #[validate(custom = "not_blank")]
    pub email: Option<String>,
    pub phone: Option<String>,
    #[validate(custom = "not_blank")]
    pub cell_number: Option<String>,
    #[validate(custom = "not_blank")]
    pub country: Option<String>,
    #[validate(custom = "not_blank")]
    pub state: Option<String>,
    #[validate(custom = "not_blank")]
    pub city: Option<String>,
    #[validate(custom = "not_blank")]
    pub address: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

impl RecordPatch<personnel::Entity> for UpdatePersonnelRequest {
    fn is_empty(&self) -> bool {
        self.role_id.is_none()
            && [
                &self.name,
                &self.last_name,
                &self.email,
                &self.phone,
                &self.cell_number,
                &self.country,
                &self.state,
                &self.city,
                &self.address,
                &self.password,
            ]
            .iter()
            .all(|field| field.is_none())
    }

    fn apply(self, model: &mut personnel::ActiveModel) -> Result<(), ServiceError> {
        let password_hash = self.password.as_deref().map(hash_password).transpose()?;
        patch_field(&mut model.name, self.name);
        patch_field(&mut model.last_name, self.last_name);
        patch_field(&mut model.role_id, self.role_id);
        patch_field(&mut model.email, self.email);
        patch_nullable(&mut model.phone, self.phone);
        patch_field(&mut model.cell_number, self.cell_number);
        patch_field(&mut model.country, self.country);
        patch_field(&mut model.state, self.state);
        patch_field(&mut model.city, self.city);
        patch_field(&mut model.address, self.address);
        patch_nullable(&mut model.password_hash, password_hash);
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required, custom = "not_blank")]
    pub email: Option<String>,
    #[validate(required)]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::verify_password;

    #[test]
    fn personnel_password_is_stored_hashed() {
        let request = CreatePersonnelRequest {
            name: Some("Ana".into()),
            last_name: Some("Ruiz".into()),
            role_id: Some(1),
            email: Some("ana@field.test".into()),
            cell_number: Some("555-0101".into()),
            country: Some("MX".into()),
            state: Some("NL".into()),
            city: Some("Monterrey".into()),
            address: Some("Av. Juarez 10".into()),
            password: Some("s3cret-pass".into()),
            ..Default::default()
        };
        request.validate().unwrap();

        let active = request.into_active_model().unwrap();
        let stored = match active.password_hash {
            Set(Some(hash)) => hash,
            other => panic!("unexpected password hash slot: {:?}", other),
        };
        assert_ne!(stored, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &stored));
    }

    #[test]
    fn short_password_is_rejected() {
        let patch = UpdatePersonnelRequest {
            password: Some("short".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }
}
