//! Project import: validation, storage and finalization of dump files.

pub mod accumulator;
pub mod attachments;
pub mod dump;
pub mod history;
pub mod resolver;
pub mod sequences;
pub mod service;
pub mod store;
pub mod validators;

pub use service::{import_project, ImportOptions};

use crate::database::entities::{projects, users};

/// Identifiers shared by every stage of one import.
pub struct ImportContext {
    pub project_id: i32,
    /// Acting user; signs synthesized history snapshots.
    pub owner: users::Model,
}

impl ImportContext {
    pub fn new(project: &projects::Model, owner: &users::Model) -> Self {
        Self {
            project_id: project.id,
            owner: owner.clone(),
        }
    }
}
