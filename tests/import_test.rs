// The full-dump fixture below is one large json! literal.
#![recursion_limit = "256"]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use serde_json::{json, Value};

use tracksmith::database::entities::{
    attachments, custom_attribute_values, epic_related_user_stories, epics, history_entries,
    issues, memberships, milestones, project_attributes, projects, role_points, roles, tasks,
    timeline_entries, user_stories, users, watchers, wiki_links, wiki_pages,
};
use tracksmith::database::migrations::Migrator;
use tracksmith::errors::ImportError;
use tracksmith::importer::{import_project, sequences, ImportOptions};
use tracksmith::services::users::create_user;
use tracksmith::storage::FileStore;

/// Single-connection in-memory database; the import transaction and the
/// assertions must see the same data.
async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.expect("connect");
    Migrator::up(&db, None).await.expect("migrate");
    db
}

struct Env {
    db: DatabaseConnection,
    files: FileStore,
    owner: users::Model,
    _dir: tempfile::TempDir,
}

async fn setup_env() -> Env {
    let db = setup_test_db().await;
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::new(dir.path()).unwrap();
    let owner = create_user(&db, "owner@example.com", "Owner").await.unwrap();
    Env { db, files, owner, _dir: dir }
}

async fn import(env: &Env, dump: &Value) -> Result<projects::Model, ImportError> {
    import_project(&env.db, &env.files, &env.owner, dump, &ImportOptions::default()).await
}

fn full_dump() -> Value {
    json!({
        "name": "Imported Project",
        "description": "full dump",
        "is_private": false,
        "is_epics_activated": true,
        "roles": [
            {"name": "Product Owner", "order": 1, "permissions": ["view_project"]},
            {"name": "Developer", "order": 2, "permissions": ["view_project", "modify_us"]}
        ],
        "memberships": [
            {"email": "dev@example.com", "role": "Developer", "is_admin": false},
            {"email": "guest@nowhere.com", "role": "Developer", "is_admin": false}
        ],
        "points": [
            {"name": "?", "order": 1},
            {"name": "3", "order": 2, "value": 3.0}
        ],
        "epic_statuses": [{"name": "New", "order": 1}],
        "us_statuses": [
            {"name": "New", "order": 1},
            {"name": "Done", "order": 2, "is_closed": true}
        ],
        "task_statuses": [
            {"name": "New", "order": 1},
            {"name": "Closed", "order": 2, "is_closed": true}
        ],
        "issue_statuses": [{"name": "New", "order": 1}],
        "issue_types": [{"name": "Bug", "order": 1}],
        "priorities": [{"name": "High", "order": 1}],
        "severities": [{"name": "Minor", "order": 1}],
        "default_us_status": "New",
        "default_task_status": "New",
        "default_issue_status": "New",
        "default_issue_type": "Bug",
        "default_priority": "High",
        "default_severity": "Minor",
        "default_points": "?",
        "default_epic_status": "New",
        "userstorycustomattributes": [{"name": "Deadline", "type": "date", "order": 1}],
        "milestones": [
            {"name": "Sprint 1", "estimated_start": "2026-01-01", "estimated_finish": "2026-01-15"}
        ],
        "issues": [
            {
                "ref": 5,
                "subject": "Crash on save",
                "status": "New",
                "type": "Bug",
                "priority": "High",
                "severity": "Minor",
                "owner": "dev@example.com"
            }
        ],
        "user_stories": [
            {
                "ref": 10,
                "subject": "As a user I want to import",
                "status": "New",
                "milestone": "Sprint 1",
                "watchers": ["dev@example.com"],
                "role_points": [{"role": "Developer", "points": "3"}],
                "custom_attributes_values": {"Deadline": "2026-02-01"},
                "generated_from_issue": 5,
                "attachments": [
                    {
                        "attached_file": {"name": "notes.txt", "data": STANDARD.encode("hello world")},
                        "description": "notes"
                    }
                ]
            },
            {"subject": "No ref story", "status": "Done"}
        ],
        "tasks": [
            {
                "ref": 12,
                "subject": "Wire the parser",
                "status": "New",
                "user_story": 10,
                "history": [
                    {
                        "type": 2,
                        "user": ["dev@example.com", "Dev"],
                        "diff": {"status": ["New", "Closed"]},
                        "values": {"status": {"New": "New", "Closed": "Closed"}},
                        "comment": "moved"
                    }
                ]
            }
        ],
        "epics": [
            {
                "subject": "Big theme",
                "status": "New",
                "related_user_stories": [{"user_story": 10, "order": 1}]
            }
        ],
        "wiki_pages": [{"slug": "home", "content": "welcome"}],
        "wiki_links": [{"title": "Home", "href": "home", "order": 1}],
        "timeline": [
            {
                "event_type": "projects.project.create",
                "data": {"user": {"email": "dev@example.com", "name": "Dev"}},
                "created": "2026-01-02T10:00:00Z"
            }
        ]
    })
}

#[tokio::test]
async fn test_full_dump_import() {
    let env = setup_env().await;
    create_user(&env.db, "dev@example.com", "Dev").await.unwrap();

    let project = import(&env, &full_dump()).await.expect("import");
    assert_eq!(project.slug, "imported-project");
    assert!(project.default_us_status_id.is_some());
    assert!(project.default_points_id.is_some());

    let role_count = roles::Entity::find()
        .filter(roles::Column::ProjectId.eq(project.id))
        .count(&env.db)
        .await
        .unwrap();
    assert_eq!(role_count, 2);

    // Owner gets an admin membership on top of the two dumped ones.
    let members = memberships::Entity::find()
        .filter(memberships::Column::ProjectId.eq(project.id))
        .all(&env.db)
        .await
        .unwrap();
    assert_eq!(members.len(), 3);
    let owner_row = members.iter().find(|m| m.email == "owner@example.com").unwrap();
    assert!(owner_row.is_admin);
    assert_eq!(owner_row.user_id, Some(env.owner.id));
    // Unknown email stays as an invitation, with a token to claim it.
    let invited = members.iter().find(|m| m.email == "guest@nowhere.com").unwrap();
    assert!(invited.user_id.is_none());
    assert!(invited.token.is_some());

    let attr_count = project_attributes::Entity::find()
        .filter(project_attributes::Column::ProjectId.eq(project.id))
        .count(&env.db)
        .await
        .unwrap();
    assert_eq!(attr_count, 11);

    let milestone = milestones::Entity::find()
        .filter(milestones::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(milestone.name, "Sprint 1");

    let stories = user_stories::Entity::find()
        .filter(user_stories::Column::ProjectId.eq(project.id))
        .all(&env.db)
        .await
        .unwrap();
    assert_eq!(stories.len(), 2);
    let main_story = stories.iter().find(|s| s.ref_num == Some(10)).unwrap();
    assert_eq!(main_story.milestone_id, Some(milestone.id));
    // Items without an owner in the dump belong to the importing user.
    let other_story = stories.iter().find(|s| s.ref_num != Some(10)).unwrap();
    assert_eq!(other_story.owner_id, Some(env.owner.id));

    // generated_from_issue resolved by ref.
    let issue = issues::Entity::find()
        .filter(issues::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(issue.ref_num, Some(5));
    assert_eq!(main_story.generated_from_issue_id, Some(issue.id));

    let task = tasks::Entity::find()
        .filter(tasks::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.ref_num, Some(12));
    assert_eq!(task.user_story_id, Some(main_story.id));

    let epic = epics::Entity::find()
        .filter(epics::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    let related = epic_related_user_stories::Entity::find()
        .filter(epic_related_user_stories::Column::EpicId.eq(epic.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(related.user_story_id, main_story.id);

    // Role points use the new role and points ids.
    let rp = role_points::Entity::find()
        .filter(role_points::Column::UserStoryId.eq(main_story.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    let points_row = project_attributes::Entity::find_by_id(rp.points_id)
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(points_row.name, "3");

    // Custom attribute values are keyed by definition id, not name.
    let values = custom_attribute_values::Entity::find()
        .filter(custom_attribute_values::Column::ObjectId.eq(main_story.id))
        .filter(custom_attribute_values::Column::ItemKind.eq("userstory"))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    let map = values.attributes_values.as_object().unwrap();
    assert_eq!(map.len(), 1);
    let key = map.keys().next().unwrap();
    assert!(key.parse::<i32>().is_ok(), "keyed by id, got {key}");
    assert_eq!(map[key], json!("2026-02-01"));

    // Attachment blob landed in the file store.
    let attachment = attachments::Entity::find()
        .filter(attachments::Column::ObjectId.eq(main_story.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attachment.size, 11);
    let stored = std::fs::read(env.files.path_of(&attachment.attached_file)).unwrap();
    assert_eq!(stored, b"hello world");

    assert_eq!(
        wiki_pages::Entity::find()
            .filter(wiki_pages::Column::ProjectId.eq(project.id))
            .count(&env.db)
            .await
            .unwrap(),
        1
    );
    assert_eq!(
        wiki_links::Entity::find()
            .filter(wiki_links::Column::ProjectId.eq(project.id))
            .count(&env.db)
            .await
            .unwrap(),
        1
    );

    // Watcher email resolved to the dev user.
    let dev_watchers = watchers::Entity::find()
        .filter(watchers::Column::ObjectId.eq(main_story.id))
        .filter(watchers::Column::ContentKind.eq("userstories.userstory"))
        .all(&env.db)
        .await
        .unwrap();
    assert_eq!(dev_watchers.len(), 1);

    // Totals were refreshed from the imported timeline.
    assert_eq!(project.total_activity, 1);
    let timeline = timeline_entries::Entity::find()
        .filter(timeline_entries::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(timeline.namespace, format!("project:{}", project.id));
}

#[tokio::test]
async fn test_history_rewrites_users_and_statuses() {
    let env = setup_env().await;
    let dev = create_user(&env.db, "dev@example.com", "Dev").await.unwrap();

    let project = import(&env, &full_dump()).await.unwrap();
    let task = tasks::Entity::find()
        .filter(tasks::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();

    let entry = history_entries::Entity::find()
        .filter(history_entries::Column::Key.eq(format!("tasks.task:{}", task.id)))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.user["pk"], json!(dev.id));
    assert_eq!(entry.user["name"], json!("Dev"));

    // Status names became the new project's ids.
    let new_status = project_attributes::Entity::find()
        .filter(project_attributes::Column::ProjectId.eq(project.id))
        .filter(project_attributes::Column::Kind.eq("task_status"))
        .filter(project_attributes::Column::Name.eq("New"))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    let diff_status = entry.diff["status"].as_array().unwrap();
    assert_eq!(diff_status[0], json!(new_status.id));
    assert!(entry.values["status"][new_status.id.to_string().as_str()].is_string());
}

#[tokio::test]
async fn test_items_without_history_get_creation_snapshot() {
    let env = setup_env().await;
    create_user(&env.db, "dev@example.com", "Dev").await.unwrap();

    let project = import(&env, &full_dump()).await.unwrap();
    let issue = issues::Entity::find()
        .filter(issues::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();

    let entry = history_entries::Entity::find()
        .filter(history_entries::Column::Key.eq(format!("issues.issue:{}", issue.id)))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.entry_type, history_entries::HISTORY_TYPE_CREATE);
    assert!(entry.is_snapshot);
    assert_eq!(entry.user["pk"], json!(env.owner.id));
}

#[tokio::test]
async fn test_invalid_section_rolls_everything_back() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Broken",
        "roles": [{"name": "Developer"}],
        "memberships": [{"email": "dev@example.com", "role": "Ghost"}]
    });
    let err = import(&env, &dump).await.unwrap_err();
    assert_eq!(err.error_code(), "IMPORT_FAILED");
    assert_eq!(err.to_string(), "error importing memberships");
    let sections = err.section_errors().unwrap();
    assert!(sections.contains_key("memberships"));
    // The error still carries the in-flight project for reporting.
    assert!(err.project().is_some());

    // Nothing was committed.
    assert_eq!(projects::Entity::find().count(&env.db).await.unwrap(), 0);
    assert_eq!(roles::Entity::find().count(&env.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_errors_accumulate_within_a_stage() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Multi",
        "roles": [{"name": "Dev"}],
        "memberships": [
            {"email": "a@x.com", "role": "Ghost"},
            {"email": "", "role": "Dev"},
            {"email": "b@x.com", "role": "AlsoGhost"}
        ]
    });
    let err = import(&env, &dump).await.unwrap_err();
    let sections = err.section_errors().unwrap();
    assert_eq!(sections["memberships"].len(), 3);
}

#[tokio::test]
async fn test_quota_rejects_before_writing() {
    let env = setup_env().await;
    let mut owner: users::ActiveModel = env.owner.clone().into();
    owner.max_private_projects = Set(Some(0));
    let owner = owner.update(&env.db).await.unwrap();

    let dump = json!({"name": "Private", "is_private": true});
    let err = import_project(&env.db, &env.files, &owner, &dump, &ImportOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_quota_error());
    assert_eq!(projects::Entity::find().count(&env.db).await.unwrap(), 0);

    // The check can be bypassed explicitly.
    let options = ImportOptions { check_quota: false };
    import_project(&env.db, &env.files, &owner, &dump, &options)
        .await
        .expect("quota check skipped");
}

#[tokio::test]
async fn test_duplicate_membership_is_skipped_not_fatal() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Dupes",
        "roles": [{"name": "Dev"}],
        "memberships": [
            {"email": "same@x.com", "role": "Dev"},
            {"email": "same@x.com", "role": "Dev", "is_admin": true}
        ]
    });
    let project = import(&env, &dump).await.expect("duplicates are warnings");

    let members = memberships::Entity::find()
        .filter(memberships::Column::ProjectId.eq(project.id))
        .filter(memberships::Column::Email.eq("same@x.com"))
        .all(&env.db)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert!(!members[0].is_admin);
}

#[tokio::test]
async fn test_owner_membership_is_matched_case_insensitively() {
    let env = setup_env().await;

    // The dump lists the owner with a different email case; no second
    // membership may be synthesized for them.
    let dump = json!({
        "name": "Cased",
        "roles": [{"name": "Dev"}],
        "memberships": [{"email": "OWNER@example.com", "role": "Dev", "is_admin": false}]
    });
    let project = import(&env, &dump).await.unwrap();

    let members = memberships::Entity::find()
        .filter(memberships::Column::ProjectId.eq(project.id))
        .all(&env.db)
        .await
        .unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, Some(env.owner.id));
    assert!(members[0].is_admin);
}

#[tokio::test]
async fn test_minimal_dump_creates_owner_membership() {
    let env = setup_env().await;

    let project = import(&env, &json!({"name": "Tiny"})).await.unwrap();

    let member = memberships::Entity::find()
        .filter(memberships::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.email, "owner@example.com");
    assert!(member.is_admin);

    // A role was synthesized to hold the membership.
    let role = roles::Entity::find_by_id(member.role_id).one(&env.db).await.unwrap().unwrap();
    assert_eq!(role.slug, "owner");
}

#[tokio::test]
async fn test_refs_are_preserved_and_sequence_continues_past_them() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Refs",
        "us_statuses": [{"name": "New"}],
        "issue_statuses": [{"name": "New"}],
        "issues": [{"ref": 40, "subject": "explicit ref"}],
        "user_stories": [
            {"subject": "first without ref"},
            {"subject": "second without ref"}
        ]
    });
    let project = import(&env, &dump).await.unwrap();

    let issue = issues::Entity::find()
        .filter(issues::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(issue.ref_num, Some(40));

    // Stories drawn from the sequence continue past the explicit ref.
    let mut refs: Vec<i64> = user_stories::Entity::find()
        .filter(user_stories::Column::ProjectId.eq(project.id))
        .all(&env.db)
        .await
        .unwrap()
        .into_iter()
        .filter_map(|s| s.ref_num)
        .collect();
    refs.sort();
    assert_eq!(refs, vec![41, 42]);

    let next = sequences::next_value(&env.db, &sequences::make_sequence_name(project.id))
        .await
        .unwrap();
    assert_eq!(next, 43);
}

#[tokio::test]
async fn test_milestone_tasks_without_us() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Sprints",
        "task_statuses": [{"name": "New"}],
        "default_task_status": "New",
        "milestones": [
            {
                "name": "Sprint 1",
                "tasks_without_us": [{"subject": "orphan task"}]
            }
        ]
    });
    let project = import(&env, &dump).await.unwrap();

    let milestone = milestones::Entity::find()
        .filter(milestones::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    let task = tasks::Entity::find()
        .filter(tasks::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(task.subject, "orphan task");
    assert_eq!(task.milestone_id, Some(milestone.id));
    assert!(task.user_story_id.is_none());
    assert!(task.ref_num.is_some());
}

#[tokio::test]
async fn test_unknown_status_fails_the_work_item_stage() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Bad Status",
        "us_statuses": [{"name": "New"}],
        "user_stories": [{"subject": "s", "status": "Missing"}]
    });
    let err = import(&env, &dump).await.unwrap_err();
    assert_eq!(err.to_string(), "error importing user stories");
    let blob = &err.section_errors().unwrap()["user_stories"][0];
    assert_eq!(blob["status"][0], json!("status=\"Missing\" not found in this project"));
}

#[tokio::test]
async fn test_duplicate_role_is_a_validation_error() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Dup Roles",
        "roles": [{"name": "Dev"}, {"name": "Dev"}]
    });
    let err = import(&env, &dump).await.unwrap_err();
    assert_eq!(err.to_string(), "error importing roles");
    let blob = &err.section_errors().unwrap()["roles"][0];
    assert_eq!(blob["name"][0], json!("name duplicated for the project"));
}

#[tokio::test]
async fn test_duplicate_status_is_a_validation_error() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Dup Statuses",
        "us_statuses": [{"name": "New"}, {"name": "New"}]
    });
    let err = import(&env, &dump).await.unwrap_err();
    assert_eq!(err.to_string(), "error importing lists of project attributes");
    assert!(err.section_errors().unwrap().contains_key("us_statuses"));
}

#[tokio::test]
async fn test_attachment_with_stripped_padding() {
    let env = setup_env().await;

    // "hello" encodes to "aGVsbG8=" and loses its padding on export.
    let dump = json!({
        "name": "Stripped",
        "us_statuses": [{"name": "New"}],
        "user_stories": [
            {
                "subject": "s",
                "attachments": [{"attached_file": {"name": "notes.txt", "data": "aGVsbG8"}}]
            }
        ]
    });
    let project = import(&env, &dump).await.unwrap();

    let attachment = attachments::Entity::find()
        .filter(attachments::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(std::fs::read(env.files.path_of(&attachment.attached_file)).unwrap(), b"hello");
}

#[tokio::test]
async fn test_slug_is_unique_across_imports() {
    let env = setup_env().await;

    let first = import(&env, &json!({"name": "Same Name"})).await.unwrap();
    let second = import(&env, &json!({"name": "Same Name"})).await.unwrap();
    assert_eq!(first.slug, "same-name");
    assert_eq!(second.slug, "same-name-1");
}

#[tokio::test]
async fn test_zero_byte_attachment() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Empty File",
        "us_statuses": [{"name": "New"}],
        "user_stories": [
            {
                "subject": "s",
                "attachments": [{"attached_file": {"name": "empty.bin", "data": ""}}]
            }
        ]
    });
    let project = import(&env, &dump).await.unwrap();

    let attachment = attachments::Entity::find()
        .filter(attachments::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(attachment.size, 0);
    assert_eq!(attachment.owner_id, Some(env.owner.id));
    assert_eq!(std::fs::read(env.files.path_of(&attachment.attached_file)).unwrap().len(), 0);
}

#[tokio::test]
async fn test_missing_project_name_is_fatal() {
    let env = setup_env().await;

    let err = import(&env, &json!({"description": "no name"})).await.unwrap_err();
    assert_eq!(err.to_string(), "error importing project data");
    assert!(err.project().is_none());
    assert!(err.section_errors().unwrap().contains_key("project"));
}

#[tokio::test]
async fn test_tags_colors_copied_onto_project() {
    let env = setup_env().await;

    let dump = json!({
        "name": "Tagged",
        "tags_colors": [["backend", "#aa0000"], ["ux", null]]
    });
    let project = import(&env, &dump).await.unwrap();
    assert_eq!(project.tags_colors, json!([["backend", "#aa0000"], ["ux", null]]));
}

#[tokio::test]
async fn test_timeline_entries_bind_to_the_project() {
    let env = setup_env().await;

    // Even item-level events from the dump attach to the project itself.
    let dump = json!({
        "name": "Events",
        "timeline": [
            {
                "event_type": "userstories.userstory.create",
                "data": {"userstory": {"subject": "s"}},
                "data_content_type": "userstories.userstory"
            }
        ]
    });
    let project = import(&env, &dump).await.unwrap();

    let entry = timeline_entries::Entity::find()
        .filter(timeline_entries::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.content_kind, "projects.project");
    assert_eq!(entry.object_id, project.id);
}

#[tokio::test]
async fn test_timeline_user_is_rewritten() {
    let env = setup_env().await;
    let dev = create_user(&env.db, "dev@example.com", "Dev").await.unwrap();

    let project = import(&env, &full_dump()).await.unwrap();
    let entry = timeline_entries::Entity::find()
        .filter(timeline_entries::Column::ProjectId.eq(project.id))
        .one(&env.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.data["user"]["id"], json!(dev.id));
    assert_eq!(entry.event_type, "projects.project.create");
}
