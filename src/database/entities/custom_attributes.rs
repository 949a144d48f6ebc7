use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Custom attribute definitions per work-item kind (`userstory`, `task`,
/// `issue`, `epic`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "custom_attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub field_type: String,
    #[sea_orm(column_name = "order_index")]
    pub order: i32,
    pub created_date: ChronoDateTimeUtc,
    pub modified_date: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
