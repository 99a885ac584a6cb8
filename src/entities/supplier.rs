use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub trade_name: String,
    pub business_type: String,
    pub cell_number: String,
    pub email: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub contact_name: String,
    pub contact_cell_phone: String,
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub website: Option<String>,
    pub billing_name: Option<String>,
    pub billing_number: Option<String>,
    pub billing_address: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub contact_area_or_position: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
