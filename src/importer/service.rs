//! The import orchestrator.
//!
//! Runs the fixed stage pipeline inside one transaction. Each stage drains
//! its dump section into the database; between stages the accumulator is
//! checked and a non-empty one aborts the import, rolling every write back.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde_json::Value;
use tracing::{error, info, warn};

use super::dump::section;
use super::store::ImportSession;
use crate::database::entities::{projects, users};
use crate::errors::ImportError;
use crate::services::totals::refresh_totals;
use crate::services::users::has_available_slot_for_new_project;
use crate::storage::FileStore;

#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Enforce the owner's project-slot quota before writing anything.
    pub check_quota: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self { check_quota: true }
    }
}

/// Number of members the imported project would have, owner included.
fn projected_memberships(owner: &users::Model, dump: &Value) -> i64 {
    let mut emails: Vec<String> = section(dump, "memberships")
        .iter()
        .filter_map(|m| m.get("email").and_then(Value::as_str))
        .map(str::to_lowercase)
        .collect();
    emails.push(owner.email.to_lowercase());
    emails.sort();
    emails.dedup();
    emails.len() as i64
}

fn check_stage<C: ConnectionTrait>(
    session: &mut ImportSession<'_, C>,
    message: &str,
    project: &projects::Model,
) -> Result<(), ImportError> {
    if session.errors.has_errors() {
        return Err(ImportError::fatal(
            message,
            Some(project.clone()),
            session.errors.get(true),
        ));
    }
    Ok(())
}

async fn run_pipeline(
    txn: &DatabaseTransaction,
    files: &FileStore,
    owner: &users::Model,
    dump: &Value,
) -> Result<(projects::Model, Vec<String>), ImportError> {
    let mut session = ImportSession::new(txn, files);

    let project = session
        .store_project(owner, dump)
        .await
        .map_err(|e| ImportError::unexpected(None, e))?;
    let Some(project) = project else {
        return Err(ImportError::fatal(
            "error importing project data",
            None,
            session.errors.get(true),
        ));
    };
    check_stage(&mut session, "error importing project data", &project)?;

    let wrap = |p: &projects::Model| {
        let p = p.clone();
        move |e: anyhow::Error| ImportError::unexpected(Some(p), e)
    };

    session.store_roles(&project, dump).await.map_err(wrap(&project))?;
    check_stage(&mut session, "error importing roles", &project)?;

    session
        .store_memberships(&project, owner, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing memberships", &project)?;

    session.store_attributes(&project, dump).await.map_err(wrap(&project))?;
    check_stage(&mut session, "error importing lists of project attributes", &project)?;

    let project = session
        .store_default_attributes(project, dump)
        .await
        .map_err(|e| ImportError::unexpected(None, e))?;
    check_stage(&mut session, "error importing default project attributes values", &project)?;

    session
        .store_custom_attributes(&project, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing custom attributes", &project)?;

    let orphan_tasks = session
        .store_milestones(&project, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing milestones", &project)?;

    let issues = session
        .store_issues(&project, owner, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing issues", &project)?;

    let stories = session
        .store_user_stories(&project, owner, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing user stories", &project)?;

    session
        .store_epics(&project, owner, dump, &stories)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing epics", &project)?;

    let tasks = session
        .store_tasks(&project, owner, dump, &orphan_tasks, &stories)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing tasks", &project)?;

    session
        .link_generated_user_stories(dump, &stories, &tasks, &issues)
        .await
        .map_err(wrap(&project))?;

    session
        .store_wiki_pages(&project, owner, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing wiki pages", &project)?;

    session.store_wiki_links(&project, dump).await.map_err(wrap(&project))?;
    check_stage(&mut session, "error importing wiki links", &project)?;

    let project = session
        .store_tags_colors(project, dump)
        .await
        .map_err(|e| ImportError::unexpected(None, e))?;

    session
        .store_timeline_entries(&project, dump)
        .await
        .map_err(wrap(&project))?;
    check_stage(&mut session, "error importing timelines", &project)?;

    let project = refresh_totals(txn, project).await.map_err(|e| ImportError::unexpected(None, e))?;

    let warnings = session.errors.warnings().to_vec();
    Ok((project, warnings))
}

/// Import a full project dump on behalf of `owner`.
///
/// Either the whole dump lands or nothing does: any stage failure rolls the
/// transaction back and the error still carries the in-flight project row
/// for reporting.
pub async fn import_project(
    db: &DatabaseConnection,
    files: &FileStore,
    owner: &users::Model,
    dump: &Value,
    options: &ImportOptions,
) -> Result<projects::Model, ImportError> {
    if options.check_quota {
        let is_private = dump.get("is_private").and_then(Value::as_bool).unwrap_or(false);
        let members = projected_memberships(owner, dump);
        let (enough, reason) = has_available_slot_for_new_project(db, owner, is_private, members)
            .await
            .map_err(|e| ImportError::unexpected(None, e))?;
        if !enough {
            return Err(ImportError::QuotaExceeded(reason));
        }
    }

    let txn = db
        .begin()
        .await
        .map_err(|e| ImportError::unexpected(None, e.into()))?;

    match run_pipeline(&txn, files, owner, dump).await {
        Ok((project, warnings)) => {
            txn.commit()
                .await
                .map_err(|e| ImportError::unexpected(Some(project.clone()), e.into()))?;
            for warning in &warnings {
                warn!("Import of {}: {}", project.slug, warning);
            }
            info!("Imported project {} ({})", project.slug, project.id);
            Ok(project)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                error!("Rollback failed after import error: {}", rollback_err);
            }
            Err(err)
        }
    }
}
