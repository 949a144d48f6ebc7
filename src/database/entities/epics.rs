use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "epics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    #[sea_orm(column_name = "ref")]
    pub ref_num: Option<i64>,
    pub subject: String,
    pub description: String,
    pub status_id: Option<i32>,
    pub owner_id: Option<i32>,
    pub assigned_to_id: Option<i32>,
    pub color: Option<String>,
    pub epics_order: i64,
    pub tags: Option<Json>,
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
    #[sea_orm(has_many = "super::epic_related_user_stories::Entity")]
    RelatedUserStories,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
