use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per work item; `attributes_values` is keyed by custom-attribute
/// definition id, never by name.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_attribute_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_kind: String,
    pub object_id: i32,
    pub attributes_values: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
