use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub trade_name: String,
    pub business_type: String,
    pub phone_or_cell: String,
    pub email: String,
    pub street: String,
    pub number: String,
    pub neighborhood: Option<String>,
    pub postal_code: Option<String>,
    pub city: String,
    pub country: String,
    pub state: String,
    pub contact_name: String,
    pub contact_cell_phone: String,
    pub contact_email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::service_order::Entity")]
    ServiceOrders,
}

impl Related<super::service_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
