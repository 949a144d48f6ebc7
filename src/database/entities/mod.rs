pub mod attachments;
pub mod custom_attribute_values;
pub mod custom_attributes;
pub mod epic_related_user_stories;
pub mod epics;
pub mod history_entries;
pub mod issues;
pub mod memberships;
pub mod milestones;
pub mod project_attributes;
pub mod project_fans;
pub mod projects;
pub mod role_points;
pub mod roles;
pub mod sequences;
pub mod tasks;
pub mod timeline_entries;
pub mod user_stories;
pub mod users;
pub mod watchers;
pub mod wiki_links;
pub mod wiki_pages;
