//! Import error types
//!
//! The engine raises at most one error per import. Validators and stores
//! never raise; they record field-keyed blobs into the accumulator and the
//! orchestrator turns a non-empty accumulator into a single [`ImportError`]
//! between stages.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

use crate::database::entities::projects;

/// Section label -> list of validator-error blobs, in insertion order.
pub type SectionErrors = IndexMap<String, Vec<Value>>;

#[derive(Error, Debug)]
pub enum ImportError {
    /// The owner cannot host this project; raised before any write.
    #[error("no available slot for project: {0}")]
    QuotaExceeded(String),

    /// A stage finished with accumulated validation errors.
    #[error("{message}")]
    Fatal {
        message: String,
        /// Partially built project, when one existed at failure time.
        project: Option<projects::Model>,
        errors: SectionErrors,
    },

    /// Anything that is not a known import failure.
    #[error("unexpected error importing project")]
    Unexpected {
        project: Option<projects::Model>,
        #[source]
        source: anyhow::Error,
    },
}

impl ImportError {
    pub fn fatal(message: impl Into<String>, project: Option<projects::Model>, errors: SectionErrors) -> Self {
        ImportError::Fatal {
            message: message.into(),
            project,
            errors,
        }
    }

    pub fn unexpected(project: Option<projects::Model>, source: anyhow::Error) -> Self {
        ImportError::Unexpected { project, source }
    }

    /// Handle to the partially built project carried by the error, if any.
    pub fn project(&self) -> Option<&projects::Model> {
        match self {
            ImportError::QuotaExceeded(_) => None,
            ImportError::Fatal { project, .. } => project.as_ref(),
            ImportError::Unexpected { project, .. } => project.as_ref(),
        }
    }

    /// Accumulated section errors, empty for non-validation failures.
    pub fn section_errors(&self) -> Option<&SectionErrors> {
        match self {
            ImportError::Fatal { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn is_quota_error(&self) -> bool {
        matches!(self, ImportError::QuotaExceeded(_))
    }

    /// Error code for API responses and CLI reporting.
    pub fn error_code(&self) -> &'static str {
        match self {
            ImportError::QuotaExceeded(_) => "QUOTA_EXCEEDED",
            ImportError::Fatal { .. } => "IMPORT_FAILED",
            ImportError::Unexpected { .. } => "UNEXPECTED_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quota_exceeded() {
        let err = ImportError::QuotaExceeded("max private projects reached".to_string());
        assert_eq!(
            err.to_string(),
            "no available slot for project: max private projects reached"
        );
        assert!(err.is_quota_error());
        assert!(err.project().is_none());
        assert_eq!(err.error_code(), "QUOTA_EXCEEDED");
    }

    #[test]
    fn test_fatal_carries_sections_in_order() {
        let mut errors = SectionErrors::new();
        errors.insert("roles".to_string(), vec![json!({"name": ["required"]})]);
        errors.insert("memberships".to_string(), vec![json!({"role": ["not found"]})]);

        let err = ImportError::fatal("error importing memberships", None, errors);
        assert_eq!(err.to_string(), "error importing memberships");
        assert_eq!(err.error_code(), "IMPORT_FAILED");

        let sections: Vec<&String> = err.section_errors().unwrap().keys().collect();
        assert_eq!(sections, ["roles", "memberships"]);
    }

    #[test]
    fn test_unexpected_wraps_source() {
        let err = ImportError::unexpected(None, anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "unexpected error importing project");
        assert_eq!(err.error_code(), "UNEXPECTED_ERROR");
    }
}
