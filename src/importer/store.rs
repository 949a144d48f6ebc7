//! Section-by-section installation of a dump into the database.
//!
//! `ImportSession` owns the per-import resolver and error accumulator and
//! walks one dump section per method. Validation failures land in the
//! accumulator; only infrastructure failures surface as `Err`.

use std::collections::HashMap;

use anyhow::Result;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::accumulator::{field_error, ErrorAccumulator};
use super::attachments::{decode_chunked_base64, store_attachment};
use super::dump::{section, value_as_i64, UserStoryData};
use super::history::{store_history_entry, take_initial_snapshot};
use super::resolver::Resolver;
use super::sequences;
use super::validators;
use super::ImportContext;
use crate::common::ContentKind;
use crate::database::entities::project_attributes::AttributeKind;
use crate::database::entities::{
    custom_attribute_values, epic_related_user_stories, issues, memberships, projects, role_points,
    roles, tasks, user_stories, users,
};
use crate::services::watchers as watcher_service;
use crate::storage::FileStore;

/// The per-kind enumeration sections of a dump, with their target attribute
/// kinds.
const ATTRIBUTE_SECTIONS: &[(&str, AttributeKind)] = &[
    ("points", AttributeKind::Points),
    ("epic_statuses", AttributeKind::EpicStatus),
    ("us_statuses", AttributeKind::UsStatus),
    ("task_statuses", AttributeKind::TaskStatus),
    ("issue_statuses", AttributeKind::IssueStatus),
    ("issue_types", AttributeKind::IssueType),
    ("priorities", AttributeKind::Priority),
    ("severities", AttributeKind::Severity),
    ("us_duedates", AttributeKind::UsDuedate),
    ("task_duedates", AttributeKind::TaskDuedate),
    ("issue_duedates", AttributeKind::IssueDuedate),
];

/// Custom-attribute definition sections, with the work-item kind they
/// describe.
const CUSTOM_ATTRIBUTE_SECTIONS: &[(&str, &str)] = &[
    ("userstorycustomattributes", "userstory"),
    ("taskcustomattributes", "task"),
    ("issuecustomattributes", "issue"),
    ("epiccustomattributes", "epic"),
];

pub struct ImportSession<'a, C: ConnectionTrait> {
    db: &'a C,
    files: &'a FileStore,
    pub resolver: Resolver,
    pub errors: ErrorAccumulator,
}

impl<'a, C: ConnectionTrait> ImportSession<'a, C> {
    pub fn new(db: &'a C, files: &'a FileStore) -> Self {
        Self {
            db,
            files,
            resolver: Resolver::new(),
            errors: ErrorAccumulator::new(),
        }
    }

    /// Install the project row itself, its logo and its ref sequence.
    pub async fn store_project(
        &mut self,
        owner: &users::Model,
        dump: &Value,
    ) -> Result<Option<projects::Model>> {
        let (model, data) = match validators::validate_project(self.db, owner, dump).await? {
            Ok(v) => v,
            Err(e) => {
                self.errors.add("project", e);
                return Ok(None);
            }
        };

        let mut project = model.insert(self.db).await?;
        debug!("Created project {} ({})", project.slug, project.id);

        if let Some(logo) = &data.logo {
            match decode_chunked_base64(&logo.data) {
                Ok(bytes) => {
                    let path = self.files.save(&logo.name, &bytes)?;
                    let mut active: projects::ActiveModel = project.into();
                    active.logo = Set(Some(path));
                    project = active.update(self.db).await?;
                }
                Err(e) => {
                    self.errors.add("project", field_error("logo", format!("invalid base64 payload: {e}")));
                }
            }
        }

        sequences::create(self.db, &sequences::make_sequence_name(project.id), 1).await?;
        Ok(Some(project))
    }

    pub async fn store_roles(&mut self, project: &projects::Model, dump: &Value) -> Result<()> {
        for raw in section(dump, "roles") {
            match validators::validate_role(self.db, project.id, raw).await? {
                Ok((model, _)) => {
                    model.insert(self.db).await?;
                }
                Err(e) => self.errors.add("roles", e),
            }
        }
        Ok(())
    }

    /// Install memberships, skipping duplicates and guaranteeing the owner
    /// ends up with an admin membership.
    pub async fn store_memberships(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
        dump: &Value,
    ) -> Result<()> {
        for raw in section(dump, "memberships") {
            let (model, data) =
                match validators::validate_membership(self.db, &mut self.resolver, project.id, raw)
                    .await?
                {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("memberships", e);
                        continue;
                    }
                };

            let duplicated = memberships::Entity::find()
                .filter(memberships::Column::ProjectId.eq(project.id))
                .filter(memberships::Column::Email.eq(data.email.clone()))
                .one(self.db)
                .await?
                .is_some();
            if duplicated {
                warn!("Duplicated membership {} skipped", data.email);
                self.errors
                    .warn(format!("membership \"{}\" duplicated, skipped", data.email));
                continue;
            }

            model.insert(self.db).await?;
        }

        self.ensure_owner_membership(project, owner).await
    }

    async fn ensure_owner_membership(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
    ) -> Result<()> {
        let existing = match memberships::Entity::find()
            .filter(memberships::Column::ProjectId.eq(project.id))
            .filter(memberships::Column::UserId.eq(owner.id))
            .one(self.db)
            .await?
        {
            Some(membership) => Some(membership),
            // An unresolved invitation may still carry the owner's email,
            // in any case.
            None => {
                memberships::Entity::find()
                    .filter(memberships::Column::ProjectId.eq(project.id))
                    .filter(
                        Expr::expr(Func::lower(Expr::col(memberships::Column::Email)))
                            .eq(owner.email.to_lowercase()),
                    )
                    .one(self.db)
                    .await?
            }
        };

        if let Some(membership) = existing {
            if !membership.is_admin || membership.user_id.is_none() {
                let mut active: memberships::ActiveModel = membership.into();
                active.is_admin = Set(true);
                active.user_id = Set(Some(owner.id));
                active.update(self.db).await?;
            }
            return Ok(());
        }

        let role = roles::Entity::find()
            .filter(roles::Column::ProjectId.eq(project.id))
            .order_by_asc(roles::Column::Order)
            .order_by_asc(roles::Column::Id)
            .one(self.db)
            .await?;
        let role_id = match role {
            Some(role) => role.id,
            None => {
                // A dump without roles still needs one for the owner.
                roles::ActiveModel {
                    project_id: Set(project.id),
                    name: Set("Owner".to_string()),
                    slug: Set("owner".to_string()),
                    order: Set(0),
                    permissions: Set(json!([])),
                    ..Default::default()
                }
                .insert(self.db)
                .await?
                .id
            }
        };

        memberships::ActiveModel {
            project_id: Set(project.id),
            user_id: Set(Some(owner.id)),
            role_id: Set(role_id),
            email: Set(owner.email.clone()),
            is_admin: Set(true),
            token: Set(None),
            invited_by_id: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;
        Ok(())
    }

    pub async fn store_attributes(&mut self, project: &projects::Model, dump: &Value) -> Result<()> {
        for &(key, kind) in ATTRIBUTE_SECTIONS {
            for raw in section(dump, key) {
                match validators::validate_attribute(self.db, project.id, kind, raw).await? {
                    Ok((model, _)) => {
                        model.insert(self.db).await?;
                    }
                    Err(e) => self.errors.add(key, e),
                }
            }
        }
        Ok(())
    }

    /// Resolve the `default_*` names of the dump against the freshly
    /// inserted enumerations. A named default must exist; an absent one
    /// falls back to the first value of its kind.
    pub async fn store_default_attributes(
        &mut self,
        project: projects::Model,
        dump: &Value,
    ) -> Result<projects::Model> {
        let project_id = project.id;
        let mut active: projects::ActiveModel = project.into();

        let fields: [(&str, AttributeKind, &mut sea_orm::ActiveValue<Option<i32>>); 8] = [
            ("default_points", AttributeKind::Points, &mut active.default_points_id),
            ("default_epic_status", AttributeKind::EpicStatus, &mut active.default_epic_status_id),
            ("default_us_status", AttributeKind::UsStatus, &mut active.default_us_status_id),
            ("default_task_status", AttributeKind::TaskStatus, &mut active.default_task_status_id),
            ("default_issue_status", AttributeKind::IssueStatus, &mut active.default_issue_status_id),
            ("default_issue_type", AttributeKind::IssueType, &mut active.default_issue_type_id),
            ("default_priority", AttributeKind::Priority, &mut active.default_priority_id),
            ("default_severity", AttributeKind::Severity, &mut active.default_severity_id),
        ];

        for (key, kind, slot) in fields {
            let resolved = match dump.get(key).and_then(Value::as_str) {
                Some(name) => {
                    match self.resolver.attribute_id(self.db, project_id, kind, name).await? {
                        Some(id) => Some(id),
                        None => {
                            self.errors.add(
                                "project",
                                field_error(key, format!("{key}=\"{name}\" not found in this project")),
                            );
                            None
                        }
                    }
                }
                None => self
                    .resolver
                    .attribute_index(self.db, project_id, kind)
                    .await?
                    .first()
                    .map(|(id, _)| *id),
            };
            *slot = Set(resolved);
        }

        Ok(active.update(self.db).await?)
    }

    pub async fn store_custom_attributes(
        &mut self,
        project: &projects::Model,
        dump: &Value,
    ) -> Result<()> {
        for &(key, kind) in CUSTOM_ATTRIBUTE_SECTIONS {
            for raw in section(dump, key) {
                match validators::validate_custom_attribute(self.db, project.id, kind, raw).await? {
                    Ok((model, _)) => {
                        model.insert(self.db).await?;
                    }
                    Err(e) => self.errors.add(key, e),
                }
            }
        }
        Ok(())
    }

    /// Install milestones. Tasks attached to a sprint but not to any user
    /// story come back to the caller, tagged with their milestone, for the
    /// task stage.
    pub async fn store_milestones(
        &mut self,
        project: &projects::Model,
        dump: &Value,
    ) -> Result<Vec<Value>> {
        let mut orphan_tasks = Vec::new();
        for raw in section(dump, "milestones") {
            let (model, data) =
                match validators::validate_milestone(self.db, &mut self.resolver, project, raw)
                    .await?
                {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("milestones", e);
                        continue;
                    }
                };
            let milestone = model.insert(self.db).await?;
            self.store_watchers(project.id, ContentKind::Milestone, milestone.id, &data.watchers)
                .await?;

            for task in &data.tasks_without_us {
                let mut task = task.clone();
                if let Some(map) = task.as_object_mut() {
                    map.insert("milestone".to_string(), json!(milestone.name));
                    map.remove("user_story");
                }
                orphan_tasks.push(task);
            }
        }
        Ok(orphan_tasks)
    }

    pub async fn store_issues(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
        dump: &Value,
    ) -> Result<HashMap<i64, issues::Model>> {
        let ctx = ImportContext::new(project, owner);
        let statuses = self.statuses_map(project.id, AttributeKind::IssueStatus).await?;
        let mut by_ref = HashMap::new();

        for raw in section(dump, "issues") {
            let (mut model, data) =
                match validators::validate_issue(self.db, &mut self.resolver, project, raw).await? {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("issues", e);
                        continue;
                    }
                };
            model.ref_num = Set(Some(self.assign_ref(project.id, data.ref_num).await?));
            let issue = model.insert(self.db).await?;
            by_ref.insert(issue.ref_num.unwrap_or_default(), issue.clone());

            self.store_item_related(
                &ctx,
                ContentKind::Issue,
                issue.id,
                serde_json::to_value(&issue)?,
                &statuses,
                ItemRelated {
                    section: "issues",
                    watchers: &data.watchers,
                    custom_values: data.custom_attributes_values.as_ref(),
                    custom_kind: "issue",
                    attachments: &data.attachments,
                    history: &data.history,
                },
            )
            .await?;
        }
        Ok(by_ref)
    }

    pub async fn store_user_stories(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
        dump: &Value,
    ) -> Result<HashMap<i64, user_stories::Model>> {
        let ctx = ImportContext::new(project, owner);
        let statuses = self.statuses_map(project.id, AttributeKind::UsStatus).await?;
        let mut by_ref = HashMap::new();

        for raw in section(dump, "user_stories") {
            let (mut model, data) =
                match validators::validate_user_story(self.db, &mut self.resolver, project, raw)
                    .await?
                {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("user_stories", e);
                        continue;
                    }
                };
            model.ref_num = Set(Some(self.assign_ref(project.id, data.ref_num).await?));
            let story = model.insert(self.db).await?;
            by_ref.insert(story.ref_num.unwrap_or_default(), story.clone());

            self.store_role_points(project.id, &story, &data).await?;
            self.store_item_related(
                &ctx,
                ContentKind::UserStory,
                story.id,
                serde_json::to_value(&story)?,
                &statuses,
                ItemRelated {
                    section: "user_stories",
                    watchers: &data.watchers,
                    custom_values: data.custom_attributes_values.as_ref(),
                    custom_kind: "userstory",
                    attachments: &data.attachments,
                    history: &data.history,
                },
            )
            .await?;
        }
        Ok(by_ref)
    }

    async fn store_role_points(
        &mut self,
        project_id: i32,
        story: &user_stories::Model,
        data: &UserStoryData,
    ) -> Result<()> {
        for rp in &data.role_points {
            let Some(role_id) = self.resolver.role_id(self.db, project_id, &rp.role).await? else {
                self.errors.add(
                    "user_stories",
                    field_error("role_points", format!("role=\"{}\" not found in this project", rp.role)),
                );
                continue;
            };
            let Some(points_id) = self
                .resolver
                .attribute_id(self.db, project_id, AttributeKind::Points, &rp.points)
                .await?
            else {
                self.errors.add(
                    "user_stories",
                    field_error("role_points", format!("points=\"{}\" not found in this project", rp.points)),
                );
                continue;
            };

            role_points::ActiveModel {
                user_story_id: Set(story.id),
                role_id: Set(role_id),
                points_id: Set(points_id),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }
        Ok(())
    }

    pub async fn store_tasks(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
        dump: &Value,
        orphan_tasks: &[Value],
        stories: &HashMap<i64, user_stories::Model>,
    ) -> Result<HashMap<i64, tasks::Model>> {
        let ctx = ImportContext::new(project, owner);
        let statuses = self.statuses_map(project.id, AttributeKind::TaskStatus).await?;
        let mut by_ref = HashMap::new();

        for raw in section(dump, "tasks").iter().chain(orphan_tasks) {
            let (mut model, data) =
                match validators::validate_task(self.db, &mut self.resolver, project, raw).await? {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("tasks", e);
                        continue;
                    }
                };

            if let Some(us_ref) = data.user_story.as_ref().and_then(value_as_i64) {
                match stories.get(&us_ref) {
                    Some(story) => model.user_story_id = Set(Some(story.id)),
                    None => {
                        self.errors.add(
                            "tasks",
                            field_error("user_story", format!("user_story=\"{us_ref}\" not found in this project")),
                        );
                        continue;
                    }
                }
            }

            model.ref_num = Set(Some(self.assign_ref(project.id, data.ref_num).await?));
            let task = model.insert(self.db).await?;
            by_ref.insert(task.ref_num.unwrap_or_default(), task.clone());

            self.store_item_related(
                &ctx,
                ContentKind::Task,
                task.id,
                serde_json::to_value(&task)?,
                &statuses,
                ItemRelated {
                    section: "tasks",
                    watchers: &data.watchers,
                    custom_values: data.custom_attributes_values.as_ref(),
                    custom_kind: "task",
                    attachments: &data.attachments,
                    history: &data.history,
                },
            )
            .await?;
        }
        Ok(by_ref)
    }

    pub async fn store_epics(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
        dump: &Value,
        stories: &HashMap<i64, user_stories::Model>,
    ) -> Result<()> {
        let ctx = ImportContext::new(project, owner);
        let statuses = self.statuses_map(project.id, AttributeKind::EpicStatus).await?;

        for raw in section(dump, "epics") {
            let (mut model, data) =
                match validators::validate_epic(self.db, &mut self.resolver, project, raw).await? {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("epics", e);
                        continue;
                    }
                };
            model.ref_num = Set(Some(self.assign_ref(project.id, data.ref_num).await?));
            let epic = model.insert(self.db).await?;

            for related in &data.related_user_stories {
                let Some(us_ref) = value_as_i64(&related.user_story) else {
                    self.errors.add(
                        "epics",
                        field_error("related_user_stories", "invalid user story reference"),
                    );
                    continue;
                };
                let Some(story) = stories.get(&us_ref) else {
                    self.errors.add(
                        "epics",
                        field_error(
                            "related_user_stories",
                            format!("user_story=\"{us_ref}\" not found in this project"),
                        ),
                    );
                    continue;
                };
                epic_related_user_stories::ActiveModel {
                    epic_id: Set(epic.id),
                    user_story_id: Set(story.id),
                    order: Set(related.order),
                    ..Default::default()
                }
                .insert(self.db)
                .await?;
            }

            self.store_item_related(
                &ctx,
                ContentKind::Epic,
                epic.id,
                serde_json::to_value(&epic)?,
                &statuses,
                ItemRelated {
                    section: "epics",
                    watchers: &data.watchers,
                    custom_values: data.custom_attributes_values.as_ref(),
                    custom_kind: "epic",
                    attachments: &data.attachments,
                    history: &data.history,
                },
            )
            .await?;
        }
        Ok(())
    }

    /// Second pass over user stories: link `generated_from_task` and
    /// `generated_from_issue` now that tasks and issues exist.
    pub async fn link_generated_user_stories(
        &mut self,
        dump: &Value,
        stories: &HashMap<i64, user_stories::Model>,
        tasks: &HashMap<i64, tasks::Model>,
        issues: &HashMap<i64, issues::Model>,
    ) -> Result<()> {
        for raw in section(dump, "user_stories") {
            let Ok(data) = serde_json::from_value::<UserStoryData>(raw.clone()) else {
                continue;
            };
            let Some(us_ref) = data.ref_num else { continue };
            let Some(story) = stories.get(&us_ref) else { continue };

            let task_id = data
                .generated_from_task
                .as_ref()
                .and_then(value_as_i64)
                .and_then(|r| tasks.get(&r))
                .map(|t| t.id);
            let issue_id = data
                .generated_from_issue
                .as_ref()
                .and_then(value_as_i64)
                .and_then(|r| issues.get(&r))
                .map(|i| i.id);
            if task_id.is_none() && issue_id.is_none() {
                continue;
            }

            let mut active: user_stories::ActiveModel = story.clone().into();
            if task_id.is_some() {
                active.generated_from_task_id = Set(task_id);
            }
            if issue_id.is_some() {
                active.generated_from_issue_id = Set(issue_id);
            }
            active.update(self.db).await?;
        }
        Ok(())
    }

    pub async fn store_wiki_pages(
        &mut self,
        project: &projects::Model,
        owner: &users::Model,
        dump: &Value,
    ) -> Result<()> {
        let ctx = ImportContext::new(project, owner);
        let statuses = HashMap::new();

        for raw in section(dump, "wiki_pages") {
            let (model, data) =
                match validators::validate_wiki_page(self.db, &mut self.resolver, project, raw)
                    .await?
                {
                    Ok(v) => v,
                    Err(e) => {
                        self.errors.add("wiki_pages", e);
                        continue;
                    }
                };
            let page = model.insert(self.db).await?;

            self.store_item_related(
                &ctx,
                ContentKind::WikiPage,
                page.id,
                serde_json::to_value(&page)?,
                &statuses,
                ItemRelated {
                    section: "wiki_pages",
                    watchers: &data.watchers,
                    custom_values: None,
                    custom_kind: "",
                    attachments: &data.attachments,
                    history: &data.history,
                },
            )
            .await?;
        }
        Ok(())
    }

    pub async fn store_wiki_links(&mut self, project: &projects::Model, dump: &Value) -> Result<()> {
        for raw in section(dump, "wiki_links") {
            match validators::validate_wiki_link(project.id, raw) {
                Ok((model, _)) => {
                    model.insert(self.db).await?;
                }
                Err(e) => self.errors.add("wiki_links", e),
            }
        }
        Ok(())
    }

    /// Copy the dump's tag color map onto the project row.
    pub async fn store_tags_colors(
        &mut self,
        project: projects::Model,
        dump: &Value,
    ) -> Result<projects::Model> {
        let Some(colors) = dump.get("tags_colors") else {
            return Ok(project);
        };
        let mut active: projects::ActiveModel = project.into();
        active.tags_colors = Set(colors.clone());
        Ok(active.update(self.db).await?)
    }

    pub async fn store_timeline_entries(
        &mut self,
        project: &projects::Model,
        dump: &Value,
    ) -> Result<()> {
        use crate::database::entities::timeline_entries;

        let namespace = format!("project:{}", project.id);
        for raw in section(dump, "timeline") {
            let data: super::dump::TimelineData = match serde_json::from_value(raw.clone()) {
                Ok(d) => d,
                Err(e) => {
                    self.errors.add("timeline", super::accumulator::invalid_payload(&e));
                    continue;
                }
            };

            // Rewrite the frozen user descriptor to the target instance.
            let mut payload = data.data.clone();
            if let Some(email) = payload
                .get("user")
                .and_then(|u| u.get("email"))
                .and_then(Value::as_str)
                .map(str::to_string)
            {
                let id = self.resolver.user_by_email(self.db, &email).await?.map(|u| u.id);
                if let Some(user) = payload.get_mut("user").and_then(Value::as_object_mut) {
                    user.insert("id".to_string(), json!(id));
                }
            }

            // Imported events always bind to the project itself; the dump
            // does not carry enough to rebind them per item.
            timeline_entries::ActiveModel {
                project_id: Set(project.id),
                namespace: Set(namespace.clone()),
                event_type: Set(data.event_type.clone()),
                content_kind: Set(ContentKind::Project.natural_key().to_string()),
                object_id: Set(project.id),
                data: Set(payload),
                created_at: Set(data.created.unwrap_or_else(chrono::Utc::now)),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }
        Ok(())
    }

    async fn store_watchers(
        &mut self,
        project_id: i32,
        kind: ContentKind,
        object_id: i32,
        emails: &[String],
    ) -> Result<()> {
        for email in emails {
            match self.resolver.user_by_email(self.db, email).await? {
                Some(user) => {
                    watcher_service::add_watcher(self.db, project_id, kind, object_id, &user)
                        .await?
                }
                None => {
                    self.errors.warn(format!("watcher \"{email}\" not found, skipped"));
                }
            }
        }
        Ok(())
    }

    /// Store the custom-attribute values of one item, rewriting name keys
    /// to definition ids.
    async fn store_custom_values(
        &mut self,
        section_name: &str,
        project_id: i32,
        custom_kind: &str,
        object_id: i32,
        values: &serde_json::Map<String, Value>,
    ) -> Result<()> {
        let index: Vec<(i32, String)> = self
            .resolver
            .custom_attribute_index(self.db, project_id, custom_kind)
            .await?
            .to_vec();

        let mut by_id = serde_json::Map::new();
        let mut unknown = Vec::new();
        for (name, value) in values {
            match index.iter().find(|(_, n)| n == name) {
                Some((id, _)) => {
                    by_id.insert(id.to_string(), value.clone());
                }
                None => unknown.push(name.clone()),
            }
        }

        if !unknown.is_empty() {
            self.errors.add(
                section_name,
                field_error(
                    "custom_attributes_values",
                    format!("unknown custom attributes: {}", unknown.join(", ")),
                ),
            );
            return Ok(());
        }

        custom_attribute_values::ActiveModel {
            item_kind: Set(custom_kind.to_string()),
            object_id: Set(object_id),
            attributes_values: Set(Value::Object(by_id)),
            ..Default::default()
        }
        .insert(self.db)
        .await?;
        Ok(())
    }

    /// Watchers, custom values, attachments and history of one installed
    /// item. Items arriving without history get a synthesized creation
    /// snapshot.
    async fn store_item_related(
        &mut self,
        ctx: &ImportContext,
        kind: ContentKind,
        object_id: i32,
        snapshot: Value,
        statuses: &HashMap<String, i32>,
        related: ItemRelated<'_>,
    ) -> Result<()> {
        self.store_watchers(ctx.project_id, kind, object_id, related.watchers).await?;

        if let Some(values) = related.custom_values {
            if !values.is_empty() {
                self.store_custom_values(
                    related.section,
                    ctx.project_id,
                    related.custom_kind,
                    object_id,
                    values,
                )
                .await?;
            }
        }

        for raw in related.attachments {
            if let Err(e) =
                store_attachment(self.db, self.files, &mut self.resolver, ctx, kind, object_id, raw)
                    .await?
            {
                self.errors.add(related.section, e);
            }
        }

        if related.history.is_empty() {
            take_initial_snapshot(self.db, ctx, kind, object_id, snapshot, &ctx.owner).await?;
        } else {
            for raw in related.history {
                if let Err(e) = store_history_entry(
                    self.db,
                    &mut self.resolver,
                    ctx,
                    kind,
                    object_id,
                    statuses,
                    raw,
                )
                .await?
                {
                    self.errors.add(related.section, e);
                }
            }
        }
        Ok(())
    }

    async fn statuses_map(
        &mut self,
        project_id: i32,
        kind: AttributeKind,
    ) -> Result<HashMap<String, i32>> {
        Ok(self
            .resolver
            .attribute_index(self.db, project_id, kind)
            .await?
            .iter()
            .map(|(id, name)| (name.clone(), *id))
            .collect())
    }

    /// Keep an explicit ref and raise the sequence past it, or draw the
    /// next value when the dump has none.
    async fn assign_ref(&mut self, project_id: i32, ref_num: Option<i64>) -> Result<i64> {
        let name = sequences::make_sequence_name(project_id);
        match ref_num {
            Some(r) => {
                sequences::set_max(self.db, &name, r).await?;
                Ok(r)
            }
            None => sequences::next_value(self.db, &name).await,
        }
    }
}

struct ItemRelated<'d> {
    section: &'static str,
    watchers: &'d [String],
    custom_values: Option<&'d serde_json::Map<String, Value>>,
    custom_kind: &'static str,
    attachments: &'d [Value],
    history: &'d [Value],
}
