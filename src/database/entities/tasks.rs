use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    #[sea_orm(column_name = "ref")]
    pub ref_num: Option<i64>,
    pub subject: String,
    pub description: String,
    pub status_id: Option<i32>,
    pub milestone_id: Option<i32>,
    pub user_story_id: Option<i32>,
    pub owner_id: Option<i32>,
    pub assigned_to_id: Option<i32>,
    pub is_blocked: bool,
    pub blocked_note: String,
    pub is_iocaine: bool,
    pub tags: Option<Json>,
    pub external_reference: Option<Json>,
    pub us_order: i64,
    pub taskboard_order: i64,
    pub created_date: ChronoDateTimeUtc,
    pub modified_date: ChronoDateTimeUtc,
    pub finished_date: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::user_stories::Entity",
        from = "Column::UserStoryId",
        to = "super::user_stories::Column::Id"
    )]
    UserStory,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::user_stories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserStory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
