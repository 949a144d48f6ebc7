pub mod totals;
pub mod users;
pub mod watchers;
