use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "epic_related_user_stories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub epic_id: i32,
    pub user_story_id: i32,
    #[sea_orm(column_name = "order_index")]
    pub order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::epics::Entity",
        from = "Column::EpicId",
        to = "super::epics::Column::Id"
    )]
    Epic,
    #[sea_orm(
        belongs_to = "super::user_stories::Entity",
        from = "Column::UserStoryId",
        to = "super::user_stories::Column::Id"
    )]
    UserStory,
}

impl Related<super::epics::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Epic.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
