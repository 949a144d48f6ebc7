//! Typed views over the self-describing dump document.
//!
//! The dump is consumed as raw JSON; each section deserializes into one of
//! these payload structs at validation time. Unknown keys are ignored,
//! missing sections behave as empty lists.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Items of a list section, or empty when the section is missing or not a
/// list.
pub fn section<'a>(dump: &'a Value, key: &str) -> &'a [Value] {
    dump.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[])
}

/// Integer coercion for ref-valued fields that dumps encode as either
/// numbers or strings.
pub fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn default_true() -> bool {
    true
}

/// An inline base64 file: `{"data": ..., "name": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FilePayload {
    pub data: String,
    pub name: String,
}

/// The project-row fields of the dump. Keys that refer to related objects
/// (roles, memberships, enumerations, defaults, work items) are simply not
/// declared here, which keeps the project validator blind to them.
#[derive(Debug, Deserialize)]
pub struct ProjectData {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: Option<FilePayload>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub anon_permissions: Vec<String>,
    #[serde(default)]
    pub public_permissions: Vec<String>,
    #[serde(default = "default_true")]
    pub is_backlog_activated: bool,
    #[serde(default)]
    pub is_kanban_activated: bool,
    #[serde(default = "default_true")]
    pub is_wiki_activated: bool,
    #[serde(default = "default_true")]
    pub is_issues_activated: bool,
    #[serde(default)]
    pub is_epics_activated: bool,
    #[serde(default)]
    pub videoconferences: Option<String>,
    #[serde(default)]
    pub videoconferences_extra_data: Option<String>,
    #[serde(default)]
    pub creation_template: Option<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RoleData {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MembershipData {
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub invited_by: Option<String>,
}

/// One value of any per-project enumeration; which fields matter depends on
/// the attribute kind.
#[derive(Debug, Deserialize)]
pub struct AttributeData {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub wip_limit: Option<i32>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub days_to_due: Option<i32>,
    #[serde(default)]
    pub by_default: bool,
}

#[derive(Debug, Deserialize)]
pub struct CustomAttributeData {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct MilestoneData {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub estimated_start: Option<NaiveDate>,
    #[serde(default)]
    pub estimated_finish: Option<NaiveDate>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    /// Tasks attached to the sprint but not to any user story.
    #[serde(default)]
    pub tasks_without_us: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RolePointData {
    pub role: String,
    pub points: String,
}

#[derive(Debug, Deserialize)]
pub struct UserStoryData {
    #[serde(default, rename = "ref")]
    pub ref_num: Option<i64>,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub blocked_note: String,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub external_reference: Option<Value>,
    #[serde(default)]
    pub backlog_order: i64,
    #[serde(default)]
    pub sprint_order: i64,
    #[serde(default)]
    pub kanban_order: i64,
    #[serde(default)]
    pub client_requirement: bool,
    #[serde(default)]
    pub team_requirement: bool,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub role_points: Vec<RolePointData>,
    #[serde(default)]
    pub custom_attributes_values: Option<serde_json::Map<String, Value>>,
    /// Refs, resolved in a second pass once tasks and issues exist.
    #[serde(default)]
    pub generated_from_task: Option<Value>,
    #[serde(default)]
    pub generated_from_issue: Option<Value>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finish_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskData {
    #[serde(default, rename = "ref")]
    pub ref_num: Option<i64>,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
    /// Ref of the owning user story.
    #[serde(default)]
    pub user_story: Option<Value>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub blocked_note: String,
    #[serde(default)]
    pub is_iocaine: bool,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub external_reference: Option<Value>,
    #[serde(default)]
    pub us_order: i64,
    #[serde(default)]
    pub taskboard_order: i64,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub custom_attributes_values: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct IssueData {
    #[serde(default, rename = "ref")]
    pub ref_num: Option<i64>,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub milestone: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub is_blocked: bool,
    #[serde(default)]
    pub blocked_note: String,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub external_reference: Option<Value>,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub custom_attributes_values: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct EpicRelatedUserStoryData {
    /// Ref of the related user story.
    pub user_story: Value,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct EpicData {
    #[serde(default, rename = "ref")]
    pub ref_num: Option<i64>,
    pub subject: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub epics_order: i64,
    #[serde(default)]
    pub tags: Option<Value>,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub related_user_stories: Vec<EpicRelatedUserStoryData>,
    #[serde(default)]
    pub custom_attributes_values: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct WikiPageData {
    pub slug: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub last_modifier: Option<String>,
    #[serde(default)]
    pub watchers: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<Value>,
    #[serde(default)]
    pub history: Vec<Value>,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct WikiLinkData {
    pub title: String,
    pub href: String,
    #[serde(default)]
    pub order: i32,
}

#[derive(Debug, Deserialize)]
pub struct AttachmentData {
    pub attached_file: FilePayload,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_deprecated: bool,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub created_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryData {
    #[serde(rename = "type")]
    pub entry_type: i32,
    /// Compact descriptor: `[email, display-name]`.
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub diff: Option<Value>,
    #[serde(default)]
    pub snapshot: Option<Value>,
    #[serde(default)]
    pub values: Option<Value>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub delete_comment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub delete_comment_user: Option<Value>,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub is_snapshot: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineData {
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
    #[serde(default, alias = "created_at")]
    pub created: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_missing_is_empty() {
        let dump = json!({"roles": [{"name": "R"}]});
        assert_eq!(section(&dump, "roles").len(), 1);
        assert!(section(&dump, "memberships").is_empty());
        assert!(section(&json!({"roles": "oops"}), "roles").is_empty());
    }

    #[test]
    fn test_value_as_i64() {
        assert_eq!(value_as_i64(&json!(42)), Some(42));
        assert_eq!(value_as_i64(&json!("42")), Some(42));
        assert_eq!(value_as_i64(&json!(" 7 ")), Some(7));
        assert_eq!(value_as_i64(&json!(null)), None);
        assert_eq!(value_as_i64(&json!("x")), None);
    }

    #[test]
    fn test_project_data_ignores_related_sections() {
        let dump = json!({
            "name": "P",
            "owner": "a@x",
            "roles": [{"name": "R"}],
            "memberships": [],
            "us_statuses": [{"name": "New"}],
            "default_us_status": "New",
            "something_unknown": 1
        });
        let data: ProjectData = serde_json::from_value(dump).unwrap();
        assert_eq!(data.name, "P");
        assert!(data.is_backlog_activated);
        assert!(!data.is_private);
    }

    #[test]
    fn test_user_story_ref_field() {
        let data: UserStoryData =
            serde_json::from_value(json!({"ref": 42, "subject": "s"})).unwrap();
        assert_eq!(data.ref_num, Some(42));
        assert!(data.watchers.is_empty());
    }
}
