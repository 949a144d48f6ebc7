//! Per-import error and warning collection.
//!
//! Validation failures are recorded against the dump section they came from
//! and reported in insertion order, so the caller sees the first broken
//! section first. Warnings are non-fatal observations (skipped duplicates,
//! unresolvable references) that survive a successful import.

use indexmap::IndexMap;
use serde_json::Value;

use crate::errors::SectionErrors;

/// Field-keyed messages for one rejected item. `"__all__"` carries
/// item-level problems such as an undecodable payload.
pub type FieldErrors = IndexMap<String, Vec<String>>;

pub fn field_error(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![message.into()]);
    errors
}

pub fn invalid_payload(err: &serde_json::Error) -> FieldErrors {
    field_error("__all__", format!("invalid payload: {err}"))
}

#[derive(Debug, Default)]
pub struct ErrorAccumulator {
    errors: SectionErrors,
    warnings: Vec<String>,
}

impl ErrorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one rejected item under a section key.
    pub fn add(&mut self, section: &str, errors: FieldErrors) {
        let value = serde_json::to_value(&errors).unwrap_or(Value::Null);
        self.errors.entry(section.to_string()).or_default().push(value);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Snapshot the accumulated errors, optionally resetting the
    /// accumulator so the next stage starts clean.
    pub fn get(&mut self, clear: bool) -> SectionErrors {
        if clear {
            std::mem::take(&mut self.errors)
        } else {
            self.errors.clone()
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_keep_insertion_order() {
        let mut acc = ErrorAccumulator::new();
        acc.add("roles", field_error("name", "required"));
        acc.add("memberships", field_error("role", "not found"));
        acc.add("roles", field_error("slug", "duplicated"));

        let errors = acc.get(false);
        let keys: Vec<_> = errors.keys().cloned().collect();
        assert_eq!(keys, vec!["roles", "memberships"]);
        assert_eq!(errors["roles"].len(), 2);
    }

    #[test]
    fn test_get_clear_resets() {
        let mut acc = ErrorAccumulator::new();
        acc.add("tasks", field_error("status", "missing"));
        assert!(acc.has_errors());

        let first = acc.get(true);
        assert_eq!(first.len(), 1);
        assert!(!acc.has_errors());
        assert!(acc.get(true).is_empty());
    }

    #[test]
    fn test_warnings_are_separate() {
        let mut acc = ErrorAccumulator::new();
        acc.warn("duplicate membership skipped");
        assert!(!acc.has_errors());
        assert_eq!(acc.warnings(), ["duplicate membership skipped"]);
    }
}
