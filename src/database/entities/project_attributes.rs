use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row per value of the per-project ordered enumerations (statuses,
/// points, priorities, severities, issue types and due-date buckets),
/// discriminated by `kind`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "project_attributes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub project_id: i32,
    pub kind: String,
    pub name: String,
    pub slug: Option<String>,
    #[sea_orm(column_name = "order_index")]
    pub order: i32,
    pub color: Option<String>,
    /// Status flags; false for non-status kinds.
    pub is_closed: bool,
    pub is_archived: bool,
    pub wip_limit: Option<i32>,
    /// Estimation value for `points` rows.
    pub value: Option<f64>,
    /// Due-date bucket fields.
    pub days_to_due: Option<i32>,
    pub by_default: bool,
}

/// Discriminator values for [`Model::kind`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AttributeKind {
    Points,
    EpicStatus,
    UsStatus,
    TaskStatus,
    IssueStatus,
    IssueType,
    Priority,
    Severity,
    UsDuedate,
    TaskDuedate,
    IssueDuedate,
}

impl AttributeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Points => "points",
            AttributeKind::EpicStatus => "epic_status",
            AttributeKind::UsStatus => "us_status",
            AttributeKind::TaskStatus => "task_status",
            AttributeKind::IssueStatus => "issue_status",
            AttributeKind::IssueType => "issue_type",
            AttributeKind::Priority => "priority",
            AttributeKind::Severity => "severity",
            AttributeKind::UsDuedate => "us_duedate",
            AttributeKind::TaskDuedate => "task_duedate",
            AttributeKind::IssueDuedate => "issue_duedate",
        }
    }

    /// Kinds that carry status flags (is_closed/is_archived/wip_limit).
    pub fn is_status(&self) -> bool {
        matches!(
            self,
            AttributeKind::EpicStatus
                | AttributeKind::UsStatus
                | AttributeKind::TaskStatus
                | AttributeKind::IssueStatus
        )
    }

    pub fn is_duedate(&self) -> bool {
        matches!(
            self,
            AttributeKind::UsDuedate | AttributeKind::TaskDuedate | AttributeKind::IssueDuedate
        )
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
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
