use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: String,
    pub logo: Option<String>,
    pub owner_id: i32,
    pub is_private: bool,
    pub anon_permissions: Json,
    pub public_permissions: Json,
    pub is_backlog_activated: bool,
    pub is_kanban_activated: bool,
    pub is_wiki_activated: bool,
    pub is_issues_activated: bool,
    pub is_epics_activated: bool,
    pub videoconferences: Option<String>,
    pub videoconferences_extra_data: Option<String>,
    pub tags_colors: Json,
    pub creation_template: Option<String>,
    pub default_points_id: Option<i32>,
    pub default_epic_status_id: Option<i32>,
    pub default_us_status_id: Option<i32>,
    pub default_task_status_id: Option<i32>,
    pub default_issue_status_id: Option<i32>,
    pub default_issue_type_id: Option<i32>,
    pub default_priority_id: Option<i32>,
    pub default_severity_id: Option<i32>,
    pub total_fans: i64,
    pub total_fans_last_week: i64,
    pub total_fans_last_month: i64,
    pub total_fans_last_year: i64,
    pub total_activity: i64,
    pub total_activity_last_week: i64,
    pub total_activity_last_month: i64,
    pub total_activity_last_year: i64,
    pub totals_updated_datetime: ChronoDateTimeUtc,
    pub created_date: ChronoDateTimeUtc,
    pub modified_date: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::roles::Entity")]
    Roles,
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
    #[sea_orm(has_many = "super::project_attributes::Entity")]
    ProjectAttributes,
    #[sea_orm(has_many = "super::milestones::Entity")]
    Milestones,
    #[sea_orm(has_many = "super::user_stories::Entity")]
    UserStories,
    #[sea_orm(has_many = "super::tasks::Entity")]
    Tasks,
    #[sea_orm(has_many = "super::issues::Entity")]
    Issues,
    #[sea_orm(has_many = "super::epics::Entity")]
    Epics,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Roles.def()
    }
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
