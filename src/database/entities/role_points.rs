use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Estimation points assigned per role on a user story.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role_points")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_story_id: i32,
    pub role_id: i32,
    pub points_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_stories::Entity",
        from = "Column::UserStoryId",
        to = "super::user_stories::Column::Id"
    )]
    UserStory,
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id"
    )]
    Role,
}

impl Related<super::user_stories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserStory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
