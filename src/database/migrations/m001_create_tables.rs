use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                full_name TEXT NOT NULL DEFAULT '',
                is_active BOOLEAN NOT NULL DEFAULT 1,
                max_private_projects INTEGER,
                max_public_projects INTEGER,
                max_memberships_private_projects INTEGER,
                max_memberships_public_projects INTEGER,
                date_joined TEXT NOT NULL
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                logo TEXT,
                owner_id INTEGER NOT NULL,
                is_private BOOLEAN NOT NULL DEFAULT 0,
                anon_permissions JSON NOT NULL DEFAULT '[]',
                public_permissions JSON NOT NULL DEFAULT '[]',
                is_backlog_activated BOOLEAN NOT NULL DEFAULT 1,
                is_kanban_activated BOOLEAN NOT NULL DEFAULT 0,
                is_wiki_activated BOOLEAN NOT NULL DEFAULT 1,
                is_issues_activated BOOLEAN NOT NULL DEFAULT 1,
                is_epics_activated BOOLEAN NOT NULL DEFAULT 0,
                videoconferences TEXT,
                videoconferences_extra_data TEXT,
                tags_colors JSON NOT NULL DEFAULT '{}',
                creation_template TEXT,
                default_points_id INTEGER,
                default_epic_status_id INTEGER,
                default_us_status_id INTEGER,
                default_task_status_id INTEGER,
                default_issue_status_id INTEGER,
                default_issue_type_id INTEGER,
                default_priority_id INTEGER,
                default_severity_id INTEGER,
                total_fans BIGINT NOT NULL DEFAULT 0,
                total_fans_last_week BIGINT NOT NULL DEFAULT 0,
                total_fans_last_month BIGINT NOT NULL DEFAULT 0,
                total_fans_last_year BIGINT NOT NULL DEFAULT 0,
                total_activity BIGINT NOT NULL DEFAULT 0,
                total_activity_last_week BIGINT NOT NULL DEFAULT 0,
                total_activity_last_month BIGINT NOT NULL DEFAULT 0,
                total_activity_last_year BIGINT NOT NULL DEFAULT 0,
                totals_updated_datetime TEXT NOT NULL,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                FOREIGN KEY (owner_id) REFERENCES users(id)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE roles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                slug TEXT NOT NULL,
                order_index INTEGER NOT NULL DEFAULT 0,
                permissions JSON NOT NULL DEFAULT '[]',
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, slug)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE memberships (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                user_id INTEGER,
                role_id INTEGER NOT NULL,
                email TEXT NOT NULL,
                is_admin BOOLEAN NOT NULL DEFAULT 0,
                token TEXT,
                invited_by_id INTEGER,
                created_at TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                FOREIGN KEY (role_id) REFERENCES roles(id),
                UNIQUE (project_id, email)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE project_attributes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                slug TEXT,
                order_index INTEGER NOT NULL DEFAULT 0,
                color TEXT,
                is_closed BOOLEAN NOT NULL DEFAULT 0,
                is_archived BOOLEAN NOT NULL DEFAULT 0,
                wip_limit INTEGER,
                value DOUBLE,
                days_to_due INTEGER,
                by_default BOOLEAN NOT NULL DEFAULT 0,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, kind, name)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE custom_attributes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT,
                field_type TEXT NOT NULL DEFAULT 'text',
                order_index INTEGER NOT NULL DEFAULT 0,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, kind, name)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE custom_attribute_values (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_kind TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                attributes_values JSON NOT NULL DEFAULT '{}',
                UNIQUE (item_kind, object_id)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE milestones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                slug TEXT,
                owner_id INTEGER,
                estimated_start TEXT,
                estimated_finish TEXT,
                closed BOOLEAN NOT NULL DEFAULT 0,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, name)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE user_stories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                ref BIGINT,
                subject TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status_id INTEGER,
                milestone_id INTEGER,
                owner_id INTEGER,
                assigned_to_id INTEGER,
                is_blocked BOOLEAN NOT NULL DEFAULT 0,
                blocked_note TEXT NOT NULL DEFAULT '',
                tags JSON,
                external_reference JSON,
                backlog_order BIGINT NOT NULL DEFAULT 0,
                sprint_order BIGINT NOT NULL DEFAULT 0,
                kanban_order BIGINT NOT NULL DEFAULT 0,
                client_requirement BOOLEAN NOT NULL DEFAULT 0,
                team_requirement BOOLEAN NOT NULL DEFAULT 0,
                generated_from_task_id INTEGER,
                generated_from_issue_id INTEGER,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                finish_date TEXT,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                FOREIGN KEY (milestone_id) REFERENCES milestones(id),
                UNIQUE (project_id, ref)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE role_points (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_story_id INTEGER NOT NULL,
                role_id INTEGER NOT NULL,
                points_id INTEGER NOT NULL,
                FOREIGN KEY (user_story_id) REFERENCES user_stories(id) ON DELETE CASCADE,
                FOREIGN KEY (role_id) REFERENCES roles(id),
                UNIQUE (user_story_id, role_id)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                ref BIGINT,
                subject TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status_id INTEGER,
                milestone_id INTEGER,
                user_story_id INTEGER,
                owner_id INTEGER,
                assigned_to_id INTEGER,
                is_blocked BOOLEAN NOT NULL DEFAULT 0,
                blocked_note TEXT NOT NULL DEFAULT '',
                is_iocaine BOOLEAN NOT NULL DEFAULT 0,
                tags JSON,
                external_reference JSON,
                us_order BIGINT NOT NULL DEFAULT 0,
                taskboard_order BIGINT NOT NULL DEFAULT 0,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                finished_date TEXT,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                FOREIGN KEY (user_story_id) REFERENCES user_stories(id),
                UNIQUE (project_id, ref)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE issues (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                ref BIGINT,
                subject TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status_id INTEGER,
                type_id INTEGER,
                priority_id INTEGER,
                severity_id INTEGER,
                milestone_id INTEGER,
                owner_id INTEGER,
                assigned_to_id INTEGER,
                is_blocked BOOLEAN NOT NULL DEFAULT 0,
                blocked_note TEXT NOT NULL DEFAULT '',
                tags JSON,
                external_reference JSON,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                finished_date TEXT,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, ref)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE epics (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                ref BIGINT,
                subject TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status_id INTEGER,
                owner_id INTEGER,
                assigned_to_id INTEGER,
                color TEXT,
                epics_order BIGINT NOT NULL DEFAULT 0,
                tags JSON,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, ref)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE epic_related_user_stories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                epic_id INTEGER NOT NULL,
                user_story_id INTEGER NOT NULL,
                order_index INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (epic_id) REFERENCES epics(id) ON DELETE CASCADE,
                FOREIGN KEY (user_story_id) REFERENCES user_stories(id) ON DELETE CASCADE,
                UNIQUE (epic_id, user_story_id)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE wiki_pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                slug TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                owner_id INTEGER,
                last_modifier_id INTEGER,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                UNIQUE (project_id, slug)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE wiki_links (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                title TEXT NOT NULL,
                href TEXT NOT NULL,
                order_index INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE history_entries (
                id TEXT PRIMARY KEY NOT NULL,
                project_id INTEGER NOT NULL,
                key TEXT NOT NULL,
                entry_type INTEGER NOT NULL,
                user JSON NOT NULL DEFAULT '{}',
                diff JSON NOT NULL DEFAULT '[]',
                snapshot JSON,
                values_map JSON NOT NULL DEFAULT '{}',
                comment TEXT NOT NULL DEFAULT '',
                delete_comment_date TEXT,
                delete_comment_user JSON,
                is_hidden BOOLEAN NOT NULL DEFAULT 0,
                is_snapshot BOOLEAN NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
            )
            "#,
        )
        .await?;

        db.execute_unprepared("CREATE INDEX idx_history_entries_key ON history_entries(key, created_at)")
            .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE attachments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                content_kind TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                owner_id INTEGER,
                name TEXT NOT NULL,
                size BIGINT NOT NULL DEFAULT 0,
                attached_file TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                is_deprecated BOOLEAN NOT NULL DEFAULT 0,
                order_index INTEGER NOT NULL DEFAULT 0,
                created_date TEXT NOT NULL,
                modified_date TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE timeline_entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                namespace TEXT NOT NULL,
                event_type TEXT NOT NULL,
                content_kind TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                data JSON NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
            )
            "#,
        )
        .await?;

        db.execute_unprepared("CREATE INDEX idx_timeline_entries_namespace ON timeline_entries(namespace, created_at)")
            .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE watchers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                content_kind TEXT NOT NULL,
                object_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id),
                UNIQUE (content_kind, object_id, user_id)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE project_fans (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                created_date TEXT NOT NULL,
                FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
                FOREIGN KEY (user_id) REFERENCES users(id),
                UNIQUE (project_id, user_id)
            )
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TABLE sequences (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                value BIGINT NOT NULL DEFAULT 0
            )
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        for table in [
            "sequences",
            "project_fans",
            "watchers",
            "timeline_entries",
            "attachments",
            "history_entries",
            "wiki_links",
            "wiki_pages",
            "epic_related_user_stories",
            "epics",
            "issues",
            "tasks",
            "role_points",
            "user_stories",
            "milestones",
            "custom_attribute_values",
            "custom_attributes",
            "project_attributes",
            "memberships",
            "roles",
            "projects",
            "users",
        ] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {}", table))
                .await?;
        }

        Ok(())
    }
}
