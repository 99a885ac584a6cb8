//! Generic CRUD repository shared by every reference resource.
//!
//! A resource plugs in by implementing [`Resource`] for its entity, plus
//! [`NewRecord`] and [`RecordPatch`] for its create/update payloads.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, QueryOrder, TransactionTrait,
};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::entities::{
    category, client, contact, personnel, product, role, service, supplier,
};
use crate::errors::ServiceError;

/// An entity exposed through the generic repository.
pub trait Resource: EntityTrait {
    /// Human readable name used in log lines and NotFound messages.
    const LABEL: &'static str;

    /// Column lists are sorted by (ascending).
    fn default_order() -> Self::Column;
}

/// A validated create payload.
pub trait NewRecord<E: EntityTrait>: Validate + Send {
    fn into_active_model(self) -> Result<E::ActiveModel, ServiceError>;
}

/// A typed partial update. Only the fields a patch type declares can be written.
pub trait RecordPatch<E: EntityTrait>: Validate + Send {
    fn is_empty(&self) -> bool;

    fn apply(self, model: &mut E::ActiveModel) -> Result<(), ServiceError>;
}

pub struct Repository<E> {
    db: Arc<DatabaseConnection>,
    _entity: PhantomData<E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> Repository<E>
where
    E: Resource,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Lists every record ordered by the resource's name column.
    #[instrument(skip(self), fields(resource = E::LABEL))]
    pub async fn list(&self) -> Result<Vec<E::Model>, ServiceError> {
        E::find()
            .order_by_asc(E::default_order())
            .all(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to list records", e))
    }

    #[instrument(skip(self), fields(resource = E::LABEL))]
    pub async fn get(&self, id: i32) -> Result<E::Model, ServiceError> {
        E::find_by_id(id)
            .one(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to fetch record", e))?
            .ok_or_else(|| ServiceError::not_found(E::LABEL, id))
    }

    #[instrument(skip(self, input), fields(resource = E::LABEL))]
    pub async fn create<N>(&self, input: N) -> Result<E::Model, ServiceError>
    where
        N: NewRecord<E>,
    {
        input.validate()?;
        let active = input.into_active_model()?;

        let model = active
            .insert(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to create record", e))?;

        info!(resource = E::LABEL, "Record created");
        Ok(model)
    }

    /// Applies `patch` to record `id` inside one transaction.
    #[instrument(skip(self, patch), fields(resource = E::LABEL))]
    pub async fn update<P>(&self, id: i32, patch: P) -> Result<E::Model, ServiceError>
    where
        P: RecordPatch<E>,
    {
        if patch.is_empty() {
            return Err(ServiceError::ValidationError(
                "No valid fields were sent for update".to_string(),
            ));
        }
        patch.validate()?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ServiceError::db_error("Failed to begin transaction", e))?;

        let existing = E::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to fetch record", e))?
            .ok_or_else(|| ServiceError::not_found(E::LABEL, id))?;

        let mut active = existing.into_active_model();
        patch.apply(&mut active)?;

        let updated = active
            .update(&txn)
            .await
            .map_err(|e| ServiceError::db_error("Failed to update record", e))?;

        txn.commit()
            .await
            .map_err(|e| ServiceError::db_error("Failed to commit transaction", e))?;

        debug!(resource = E::LABEL, id, "Record updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(resource = E::LABEL))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let result = E::delete_by_id(id)
            .exec(&*self.db)
            .await
            .map_err(|e| ServiceError::db_error("Failed to delete record", e))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(E::LABEL, id));
        }

        info!(resource = E::LABEL, id, "Record deleted");
        Ok(())
    }
}

impl Resource for category::Entity {
    const LABEL: &'static str = "Category";

    fn default_order() -> Self::Column {
        category::Column::Name
    }
}

impl Resource for role::Entity {
    const LABEL: &'static str = "Role";

    fn default_order() -> Self::Column {
        role::Column::Name
    }
}

impl Resource for supplier::Entity {
    const LABEL: &'static str = "Supplier";

    fn default_order() -> Self::Column {
        supplier::Column::TradeName
    }
}

impl Resource for client::Entity {
    const LABEL: &'static str = "Client";

    fn default_order() -> Self::Column {
        client::Column::TradeName
    }
}

impl Resource for contact::Entity {
    const LABEL: &'static str = "Contact";

    fn default_order() -> Self::Column {
        contact::Column::Name
    }
}

impl Resource for personnel::Entity {
    const LABEL: &'static str = "Personnel";

    fn default_order() -> Self::Column {
        personnel::Column::Name
    }
}

impl Resource for product::Entity {
    const LABEL: &'static str = "Product";

    fn default_order() -> Self::Column {
        product::Column::Name
    }
}

impl Resource for service::Entity {
    const LABEL: &'static str = "Service";

    fn default_order() -> Self::Column {
        service::Column::Name
    }
}

pub type CategoryRepository = Repository<category::Entity>;
pub type RoleRepository = Repository<role::Entity>;
pub type SupplierRepository = Repository<supplier::Entity>;
pub type ClientRepository = Repository<client::Entity>;
pub type ContactRepository = Repository<contact::Entity>;
pub type PersonnelRepository = Repository<personnel::Entity>;
pub type ProductRepository = Repository<product::Entity>;
pub type ServiceRepository = Repository<service::Entity>;
