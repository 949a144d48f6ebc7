use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A file attached to a work item or wiki page. `attached_file` is the
/// path inside the configured file store.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub content_kind: String,
    pub object_id: i32,
    pub owner_id: Option<i32>,
    pub name: String,
    pub size: i64,
    pub attached_file: String,
    pub description: String,
    pub is_deprecated: bool,
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
