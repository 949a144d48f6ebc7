use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Entry types for [`Model::entry_type`].
pub const HISTORY_TYPE_CREATE: i32 = 1;
pub const HISTORY_TYPE_CHANGE: i32 = 2;
pub const HISTORY_TYPE_DELETE: i32 = 3;

/// A version-history record. `key` is the opaque `"{app}.{model}:{id}"`
/// pointer to the owning object; entries are ordered by `created_at`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "history_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: i32,
    pub key: String,
    pub entry_type: i32,
    /// Compact user descriptor: `{"pk": id|null, "name": display-name}`.
    pub user: Json,
    pub diff: Json,
    pub snapshot: Option<Json>,
    #[sea_orm(column_name = "values_map")]
    pub values: Json,
    pub comment: String,
    pub delete_comment_date: Option<ChronoDateTimeUtc>,
    pub delete_comment_user: Option<Json>,
    pub is_hidden: bool,
    pub is_snapshot: bool,
    pub created_at: ChronoDateTimeUtc,
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
