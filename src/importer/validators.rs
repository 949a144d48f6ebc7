//! Per-section validation of dump items.
//!
//! Each validator deserializes one raw item, checks it against the target
//! project, and either hands back a ready-to-insert row (plus the typed
//! payload, which carries nested sections for later stages) or the
//! field-keyed errors describing the rejection.

use anyhow::Result;
use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde_json::{json, Value};
use uuid::Uuid;

use super::accumulator::{field_error, invalid_payload, FieldErrors};
use super::dump::{
    AttributeData, CustomAttributeData, EpicData, IssueData, MembershipData, MilestoneData,
    ProjectData, RoleData, TaskData, UserStoryData, WikiLinkData, WikiPageData,
};
use super::resolver::Resolver;
use crate::database::entities::project_attributes::AttributeKind;
use crate::database::entities::{
    epics, issues, memberships, milestones, project_attributes, projects, roles, tasks,
    user_stories, users, wiki_links, wiki_pages,
};
use crate::utils::slugify;

/// Either a validated row or the reasons it was rejected.
pub type Validated<T> = std::result::Result<T, FieldErrors>;

fn not_found(field: &str, value: &str) -> FieldErrors {
    field_error(field, format!("{field}=\"{value}\" not found in this project"))
}

/// Pick a project slug that is unique across the instance, suffixing the
/// base slug with a counter when taken.
async fn unique_project_slug<C: ConnectionTrait>(db: &C, base: &str) -> Result<String> {
    let base = if base.is_empty() { "project".to_string() } else { base.to_string() };
    let mut candidate = base.clone();
    let mut suffix = 1;
    loop {
        let taken = projects::Entity::find()
            .filter(projects::Column::Slug.eq(candidate.clone()))
            .one(db)
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
}

pub async fn validate_project<C: ConnectionTrait>(
    db: &C,
    owner: &users::Model,
    raw: &Value,
) -> Result<Validated<(projects::ActiveModel, ProjectData)>> {
    let data: ProjectData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };

    if data.name.trim().is_empty() {
        return Ok(Err(field_error("name", "this field may not be blank")));
    }

    let base_slug = slugify(data.slug.as_deref().unwrap_or(&data.name));
    let slug = unique_project_slug(db, &base_slug).await?;
    let now = Utc::now();

    let model = projects::ActiveModel {
        name: Set(data.name.clone()),
        slug: Set(slug),
        description: Set(data.description.clone()),
        logo: Set(None),
        owner_id: Set(owner.id),
        is_private: Set(data.is_private),
        anon_permissions: Set(json!(data.anon_permissions)),
        public_permissions: Set(json!(data.public_permissions)),
        is_backlog_activated: Set(data.is_backlog_activated),
        is_kanban_activated: Set(data.is_kanban_activated),
        is_wiki_activated: Set(data.is_wiki_activated),
        is_issues_activated: Set(data.is_issues_activated),
        is_epics_activated: Set(data.is_epics_activated),
        videoconferences: Set(data.videoconferences.clone()),
        videoconferences_extra_data: Set(data.videoconferences_extra_data.clone()),
        tags_colors: Set(json!({})),
        creation_template: Set(data.creation_template.clone()),
        default_points_id: Set(None),
        default_epic_status_id: Set(None),
        default_us_status_id: Set(None),
        default_task_status_id: Set(None),
        default_issue_status_id: Set(None),
        default_issue_type_id: Set(None),
        default_priority_id: Set(None),
        default_severity_id: Set(None),
        total_fans: Set(0),
        total_fans_last_week: Set(0),
        total_fans_last_month: Set(0),
        total_fans_last_year: Set(0),
        total_activity: Set(0),
        total_activity_last_week: Set(0),
        total_activity_last_month: Set(0),
        total_activity_last_year: Set(0),
        totals_updated_datetime: Set(now),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        ..Default::default()
    };

    Ok(Ok((model, data)))
}

pub async fn validate_role<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    raw: &Value,
) -> Result<Validated<(roles::ActiveModel, RoleData)>> {
    let data: RoleData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.name.trim().is_empty() {
        return Ok(Err(field_error("name", "this field may not be blank")));
    }

    let slug = data.slug.clone().unwrap_or_else(|| slugify(&data.name));
    let duplicated = roles::Entity::find()
        .filter(roles::Column::ProjectId.eq(project_id))
        .filter(roles::Column::Slug.eq(slug.clone()))
        .one(db)
        .await?
        .is_some();
    if duplicated {
        return Ok(Err(field_error("name", "name duplicated for the project")));
    }

    let model = roles::ActiveModel {
        project_id: Set(project_id),
        name: Set(data.name.clone()),
        slug: Set(slug),
        order: Set(data.order),
        permissions: Set(json!(data.permissions)),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_membership<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project_id: i32,
    raw: &Value,
) -> Result<Validated<(memberships::ActiveModel, MembershipData)>> {
    let data: MembershipData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.email.trim().is_empty() {
        return Ok(Err(field_error("email", "this field may not be blank")));
    }

    let Some(role_id) = resolver.role_id(db, project_id, &data.role).await? else {
        return Ok(Err(not_found("role", &data.role)));
    };

    let user = resolver.user_by_email(db, &data.email).await?;
    let invited_by_id = match &data.invited_by {
        Some(email) => resolver.user_by_email(db, email).await?.map(|u| u.id),
        None => None,
    };

    let model = memberships::ActiveModel {
        project_id: Set(project_id),
        user_id: Set(user.map(|u| u.id)),
        role_id: Set(role_id),
        email: Set(data.email.clone()),
        is_admin: Set(data.is_admin),
        token: Set(Some(Uuid::new_v4().to_string())),
        invited_by_id: Set(invited_by_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_attribute<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    kind: AttributeKind,
    raw: &Value,
) -> Result<Validated<(project_attributes::ActiveModel, AttributeData)>> {
    let data: AttributeData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.name.trim().is_empty() {
        return Ok(Err(field_error("name", "this field may not be blank")));
    }

    let duplicated = project_attributes::Entity::find()
        .filter(project_attributes::Column::ProjectId.eq(project_id))
        .filter(project_attributes::Column::Kind.eq(kind.as_str()))
        .filter(project_attributes::Column::Name.eq(data.name.clone()))
        .one(db)
        .await?
        .is_some();
    if duplicated {
        return Ok(Err(field_error("name", "name duplicated for the project")));
    }

    let model = project_attributes::ActiveModel {
        project_id: Set(project_id),
        kind: Set(kind.as_str().to_string()),
        name: Set(data.name.clone()),
        slug: Set(data.slug.clone()),
        order: Set(data.order),
        color: Set(data.color.clone()),
        is_closed: Set(kind.is_status() && data.is_closed),
        is_archived: Set(kind.is_status() && data.is_archived),
        wip_limit: Set(if kind.is_status() { data.wip_limit } else { None }),
        value: Set(if kind == AttributeKind::Points { data.value } else { None }),
        days_to_due: Set(if kind.is_duedate() { data.days_to_due } else { None }),
        by_default: Set(kind.is_duedate() && data.by_default),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_custom_attribute<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    kind: &str,
    raw: &Value,
) -> Result<Validated<(crate::database::entities::custom_attributes::ActiveModel, CustomAttributeData)>>
{
    use crate::database::entities::custom_attributes;

    let data: CustomAttributeData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.name.trim().is_empty() {
        return Ok(Err(field_error("name", "this field may not be blank")));
    }

    let duplicated = custom_attributes::Entity::find()
        .filter(custom_attributes::Column::ProjectId.eq(project_id))
        .filter(custom_attributes::Column::Kind.eq(kind))
        .filter(custom_attributes::Column::Name.eq(data.name.clone()))
        .one(db)
        .await?
        .is_some();
    if duplicated {
        return Ok(Err(field_error("name", "name duplicated for the project")));
    }

    let now = Utc::now();
    let model = custom_attributes::ActiveModel {
        project_id: Set(project_id),
        kind: Set(kind.to_string()),
        name: Set(data.name.clone()),
        description: Set(data.description.clone()),
        field_type: Set(data.field_type.clone().unwrap_or_else(|| "text".to_string())),
        order: Set(data.order),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_milestone<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project: &projects::Model,
    raw: &Value,
) -> Result<Validated<(milestones::ActiveModel, MilestoneData)>> {
    let data: MilestoneData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.name.trim().is_empty() {
        return Ok(Err(field_error("name", "this field may not be blank")));
    }

    let duplicated = milestones::Entity::find()
        .filter(milestones::Column::ProjectId.eq(project.id))
        .filter(milestones::Column::Name.eq(data.name.clone()))
        .one(db)
        .await?
        .is_some();
    if duplicated {
        return Ok(Err(field_error("name", "name duplicated for the project")));
    }

    let owner_id = match &data.owner {
        Some(email) => resolver.user_by_email(db, email).await?.map(|u| u.id),
        None => None,
    };

    let now = Utc::now();
    let model = milestones::ActiveModel {
        project_id: Set(project.id),
        name: Set(data.name.clone()),
        slug: Set(Some(data.slug.clone().unwrap_or_else(|| slugify(&data.name)))),
        owner_id: Set(owner_id.or(Some(project.owner_id))),
        estimated_start: Set(data.estimated_start),
        estimated_finish: Set(data.estimated_finish),
        closed: Set(data.closed),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

async fn resolve_user<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    email: &Option<String>,
) -> Result<Option<i32>> {
    match email {
        Some(email) => Ok(resolver.user_by_email(db, email).await?.map(|u| u.id)),
        None => Ok(None),
    }
}

/// Resolve an attribute reference: a named value must exist, a missing one
/// falls back to the project default.
async fn resolve_attribute<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project_id: i32,
    kind: AttributeKind,
    field: &str,
    name: &Option<String>,
    default: Option<i32>,
) -> Result<Validated<Option<i32>>> {
    match name {
        Some(name) => match resolver.attribute_id(db, project_id, kind, name).await? {
            Some(id) => Ok(Ok(Some(id))),
            None => Ok(Err(not_found(field, name))),
        },
        None => Ok(Ok(default)),
    }
}

async fn resolve_milestone<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project_id: i32,
    name: &Option<String>,
) -> Result<Validated<Option<i32>>> {
    match name {
        Some(name) => match resolver.milestone_id(db, project_id, name).await? {
            Some(id) => Ok(Ok(Some(id))),
            None => Ok(Err(not_found("milestone", name))),
        },
        None => Ok(Ok(None)),
    }
}

pub async fn validate_user_story<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project: &projects::Model,
    raw: &Value,
) -> Result<Validated<(user_stories::ActiveModel, UserStoryData)>> {
    let data: UserStoryData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.subject.trim().is_empty() {
        return Ok(Err(field_error("subject", "this field may not be blank")));
    }

    let status_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::UsStatus,
        "status",
        &data.status,
        project.default_us_status_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };
    let milestone_id = match resolve_milestone(db, resolver, project.id, &data.milestone).await? {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };

    let now = Utc::now();
    let model = user_stories::ActiveModel {
        project_id: Set(project.id),
        ref_num: Set(None),
        subject: Set(data.subject.clone()),
        description: Set(data.description.clone()),
        status_id: Set(status_id),
        milestone_id: Set(milestone_id),
        owner_id: Set(resolve_user(db, resolver, &data.owner).await?.or(Some(project.owner_id))),
        assigned_to_id: Set(resolve_user(db, resolver, &data.assigned_to).await?),
        is_blocked: Set(data.is_blocked),
        blocked_note: Set(data.blocked_note.clone()),
        tags: Set(data.tags.clone()),
        external_reference: Set(data.external_reference.clone()),
        backlog_order: Set(data.backlog_order),
        sprint_order: Set(data.sprint_order),
        kanban_order: Set(data.kanban_order),
        client_requirement: Set(data.client_requirement),
        team_requirement: Set(data.team_requirement),
        generated_from_task_id: Set(None),
        generated_from_issue_id: Set(None),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        finish_date: Set(data.finish_date),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_task<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project: &projects::Model,
    raw: &Value,
) -> Result<Validated<(tasks::ActiveModel, TaskData)>> {
    let data: TaskData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.subject.trim().is_empty() {
        return Ok(Err(field_error("subject", "this field may not be blank")));
    }

    let status_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::TaskStatus,
        "status",
        &data.status,
        project.default_task_status_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };
    let milestone_id = match resolve_milestone(db, resolver, project.id, &data.milestone).await? {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };

    let now = Utc::now();
    let model = tasks::ActiveModel {
        project_id: Set(project.id),
        ref_num: Set(None),
        subject: Set(data.subject.clone()),
        description: Set(data.description.clone()),
        status_id: Set(status_id),
        milestone_id: Set(milestone_id),
        user_story_id: Set(None),
        owner_id: Set(resolve_user(db, resolver, &data.owner).await?.or(Some(project.owner_id))),
        assigned_to_id: Set(resolve_user(db, resolver, &data.assigned_to).await?),
        is_blocked: Set(data.is_blocked),
        blocked_note: Set(data.blocked_note.clone()),
        is_iocaine: Set(data.is_iocaine),
        tags: Set(data.tags.clone()),
        external_reference: Set(data.external_reference.clone()),
        us_order: Set(data.us_order),
        taskboard_order: Set(data.taskboard_order),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        finished_date: Set(data.finished_date),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_issue<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project: &projects::Model,
    raw: &Value,
) -> Result<Validated<(issues::ActiveModel, IssueData)>> {
    let data: IssueData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.subject.trim().is_empty() {
        return Ok(Err(field_error("subject", "this field may not be blank")));
    }

    let status_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::IssueStatus,
        "status",
        &data.status,
        project.default_issue_status_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };
    let type_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::IssueType,
        "type",
        &data.issue_type,
        project.default_issue_type_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };
    let priority_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::Priority,
        "priority",
        &data.priority,
        project.default_priority_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };
    let severity_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::Severity,
        "severity",
        &data.severity,
        project.default_severity_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };
    let milestone_id = match resolve_milestone(db, resolver, project.id, &data.milestone).await? {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };

    let now = Utc::now();
    let model = issues::ActiveModel {
        project_id: Set(project.id),
        ref_num: Set(None),
        subject: Set(data.subject.clone()),
        description: Set(data.description.clone()),
        status_id: Set(status_id),
        type_id: Set(type_id),
        priority_id: Set(priority_id),
        severity_id: Set(severity_id),
        milestone_id: Set(milestone_id),
        owner_id: Set(resolve_user(db, resolver, &data.owner).await?.or(Some(project.owner_id))),
        assigned_to_id: Set(resolve_user(db, resolver, &data.assigned_to).await?),
        is_blocked: Set(data.is_blocked),
        blocked_note: Set(data.blocked_note.clone()),
        tags: Set(data.tags.clone()),
        external_reference: Set(data.external_reference.clone()),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        finished_date: Set(data.finished_date),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_epic<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project: &projects::Model,
    raw: &Value,
) -> Result<Validated<(epics::ActiveModel, EpicData)>> {
    let data: EpicData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.subject.trim().is_empty() {
        return Ok(Err(field_error("subject", "this field may not be blank")));
    }

    let status_id = match resolve_attribute(
        db,
        resolver,
        project.id,
        AttributeKind::EpicStatus,
        "status",
        &data.status,
        project.default_epic_status_id,
    )
    .await?
    {
        Ok(id) => id,
        Err(e) => return Ok(Err(e)),
    };

    let now = Utc::now();
    let model = epics::ActiveModel {
        project_id: Set(project.id),
        ref_num: Set(None),
        subject: Set(data.subject.clone()),
        description: Set(data.description.clone()),
        status_id: Set(status_id),
        owner_id: Set(resolve_user(db, resolver, &data.owner).await?.or(Some(project.owner_id))),
        assigned_to_id: Set(resolve_user(db, resolver, &data.assigned_to).await?),
        color: Set(data.color.clone()),
        epics_order: Set(data.epics_order),
        tags: Set(data.tags.clone()),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub async fn validate_wiki_page<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    project: &projects::Model,
    raw: &Value,
) -> Result<Validated<(wiki_pages::ActiveModel, WikiPageData)>> {
    let data: WikiPageData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };
    if data.slug.trim().is_empty() {
        return Ok(Err(field_error("slug", "this field may not be blank")));
    }

    let duplicated = wiki_pages::Entity::find()
        .filter(wiki_pages::Column::ProjectId.eq(project.id))
        .filter(wiki_pages::Column::Slug.eq(data.slug.clone()))
        .one(db)
        .await?
        .is_some();
    if duplicated {
        return Ok(Err(field_error("slug", "slug duplicated for the project")));
    }

    let now = Utc::now();
    let model = wiki_pages::ActiveModel {
        project_id: Set(project.id),
        slug: Set(data.slug.clone()),
        content: Set(data.content.clone()),
        owner_id: Set(resolve_user(db, resolver, &data.owner).await?.or(Some(project.owner_id))),
        last_modifier_id: Set(resolve_user(db, resolver, &data.last_modifier).await?),
        created_date: Set(data.created_date.unwrap_or(now)),
        modified_date: Set(data.modified_date.unwrap_or(now)),
        ..Default::default()
    };
    Ok(Ok((model, data)))
}

pub fn validate_wiki_link(
    project_id: i32,
    raw: &Value,
) -> Validated<(wiki_links::ActiveModel, WikiLinkData)> {
    let data: WikiLinkData = serde_json::from_value(raw.clone()).map_err(|e| invalid_payload(&e))?;
    if data.title.trim().is_empty() {
        return Err(field_error("title", "this field may not be blank"));
    }

    let model = wiki_links::ActiveModel {
        project_id: Set(project_id),
        title: Set(data.title.clone()),
        href: Set(data.href.clone()),
        order: Set(data.order),
        ..Default::default()
    };
    Ok((model, data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use crate::services::users::create_user;
    use sea_orm::ActiveModelTrait;
    use serde_json::json;

    #[tokio::test]
    async fn test_project_slug_collision_gets_suffix() {
        let db = setup_test_db().await;
        let owner = create_user(&db, "o@x", "O").await.unwrap();

        let (first, _) = validate_project(&db, &owner, &json!({"name": "My Project"}))
            .await
            .unwrap()
            .unwrap();
        let first = first.insert(&db).await.unwrap();
        assert_eq!(first.slug, "my-project");

        let (second, _) = validate_project(&db, &owner, &json!({"name": "My Project"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.slug.as_ref().as_str(), "my-project-1");
    }

    #[tokio::test]
    async fn test_project_requires_name() {
        let db = setup_test_db().await;
        let owner = create_user(&db, "o@x", "O").await.unwrap();

        let errors = validate_project(&db, &owner, &json!({"name": "  "}))
            .await
            .unwrap()
            .unwrap_err();
        assert!(errors.contains_key("name"));
    }

    #[tokio::test]
    async fn test_role_slug_defaults_from_name() {
        let db = setup_test_db().await;
        let (model, _) = validate_role(&db, 1, &json!({"name": "Product Owner"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(model.slug.as_ref().as_str(), "product-owner");
    }

    #[tokio::test]
    async fn test_membership_unknown_role_is_rejected() {
        let db = setup_test_db().await;
        let mut resolver = Resolver::new();

        let errors =
            validate_membership(&db, &mut resolver, 1, &json!({"email": "m@x", "role": "Ghost"}))
                .await
                .unwrap()
                .unwrap_err();
        assert_eq!(errors["role"], vec!["role=\"Ghost\" not found in this project"]);
    }

    #[tokio::test]
    async fn test_points_attribute_keeps_value_only() {
        let db = setup_test_db().await;
        let raw = json!({"name": "XL", "value": 13.0, "is_closed": true});
        let (model, _) = validate_attribute(&db, 1, AttributeKind::Points, &raw)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(model.value.as_ref(), &Some(13.0));
        assert!(!model.is_closed.as_ref());
    }
}
