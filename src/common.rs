//! Cross-cutting domain vocabulary.

use serde::{Deserialize, Serialize};

/// The closed set of object kinds that attachments, watchers, history and
/// timeline rows can point at.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Project,
    Milestone,
    Epic,
    UserStory,
    Task,
    Issue,
    WikiPage,
}

impl ContentKind {
    /// The `"{app}.{model}"` form used in history keys and dump files.
    pub fn natural_key(&self) -> &'static str {
        match self {
            ContentKind::Project => "projects.project",
            ContentKind::Milestone => "milestones.milestone",
            ContentKind::Epic => "epics.epic",
            ContentKind::UserStory => "userstories.userstory",
            ContentKind::Task => "tasks.task",
            ContentKind::Issue => "issues.issue",
            ContentKind::WikiPage => "wiki.wikipage",
        }
    }

    /// History key for one object of this kind.
    pub fn history_key(&self, object_id: i32) -> String {
        format!("{}:{}", self.natural_key(), object_id)
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.natural_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_keys_are_distinct() {
        let kinds = [
            ContentKind::Project,
            ContentKind::Milestone,
            ContentKind::Epic,
            ContentKind::UserStory,
            ContentKind::Task,
            ContentKind::Issue,
            ContentKind::WikiPage,
        ];
        let keys: std::collections::HashSet<&str> =
            kinds.iter().map(|k| k.natural_key()).collect();
        assert_eq!(keys.len(), kinds.len());
    }

    #[test]
    fn test_history_key() {
        assert_eq!(
            ContentKind::UserStory.history_key(42),
            "userstories.userstory:42"
        );
    }
}
