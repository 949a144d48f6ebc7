//! Version-history installation.
//!
//! Dump history entries carry users as `[email, display-name]` pairs and
//! statuses by name; both are rewritten against the target instance before
//! the row is stored.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use serde_json::{json, Value};
use uuid::Uuid;

use super::accumulator::{invalid_payload, FieldErrors};
use super::dump::HistoryData;
use super::resolver::Resolver;
use super::ImportContext;
use crate::common::ContentKind;
use crate::database::entities::history_entries::{self, HISTORY_TYPE_CREATE};
use crate::database::entities::users;

/// Turn a `[email, name]` descriptor into the stored
/// `{"pk": id|null, "name": name}` form. Objects already in stored form
/// pass through.
async fn rewrite_user<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    raw: &Value,
) -> Result<Value> {
    if let Some(pair) = raw.as_array() {
        let email = pair.first().and_then(Value::as_str);
        let name = pair.get(1).and_then(Value::as_str).unwrap_or("");
        let pk = match email {
            Some(email) => resolver.user_by_email(db, email).await?.map(|u| u.id),
            None => None,
        };
        return Ok(json!({"pk": pk, "name": name}));
    }
    if let Some(obj) = raw.as_object() {
        // Already in stored form; drop pks that do not exist here.
        let name = obj.get("name").cloned().unwrap_or(json!(""));
        let pk = match obj.get("pk").and_then(Value::as_i64) {
            Some(pk) => resolver.user_by_pk(db, pk as i32).await?.map(|u| u.id),
            None => None,
        };
        return Ok(json!({"pk": pk, "name": name}));
    }
    Ok(json!({"pk": null, "name": ""}))
}

/// Rewrite a frozen snapshot: a `status` name becomes the matching status
/// id, `owner`/`assigned_to` emails become user pks.
async fn rewrite_snapshot<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    snapshot: Value,
    statuses: &HashMap<String, i32>,
) -> Result<Value> {
    let mut map = match snapshot {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    if let Some(name) = map.get("status").and_then(Value::as_str) {
        if let Some(id) = statuses.get(name) {
            map.insert("status".to_string(), json!(id));
        }
    }
    for field in ["owner", "assigned_to"] {
        let email = map.get(field).and_then(Value::as_str).map(str::to_string);
        if let Some(email) = email {
            let pk = resolver.user_by_email(db, &email).await?.map(|u| u.id);
            map.insert(field.to_string(), json!(pk));
        }
    }
    Ok(Value::Object(map))
}

/// Rewrite `diff["status"]` pairs from names to the target project's
/// status ids. Unknown names become null.
fn rewrite_diff(diff: Value, statuses: &HashMap<String, i32>) -> Value {
    let mut map = match diff {
        Value::Object(map) => map,
        other => return other,
    };
    if let Some(Value::Array(pair)) = map.get("status") {
        let rewritten: Vec<Value> = pair
            .iter()
            .map(|v| match v.as_str().and_then(|name| statuses.get(name)) {
                Some(id) => json!(id),
                None => Value::Null,
            })
            .collect();
        map.insert("status".to_string(), Value::Array(rewritten));
    }
    Value::Object(map)
}

/// Rewrite `values["status"]` keys from names to id strings, preserving the
/// display name as the value.
fn rewrite_values(values: Value, statuses: &HashMap<String, i32>) -> Value {
    let mut map = match values {
        Value::Object(map) => map,
        other => return other,
    };
    if let Some(Value::Object(by_name)) = map.get("status") {
        let mut by_id = serde_json::Map::new();
        for (name, repr) in by_name {
            match statuses.get(name) {
                Some(id) => {
                    by_id.insert(id.to_string(), repr.clone());
                }
                None => {
                    by_id.insert(name.clone(), repr.clone());
                }
            }
        }
        map.insert("status".to_string(), Value::Object(by_id));
    }
    Value::Object(map)
}

/// Install one dump history entry for an object.
pub async fn store_history_entry<C: ConnectionTrait>(
    db: &C,
    resolver: &mut Resolver,
    ctx: &ImportContext,
    kind: ContentKind,
    object_id: i32,
    statuses: &HashMap<String, i32>,
    raw: &Value,
) -> Result<std::result::Result<history_entries::Model, FieldErrors>> {
    let data: HistoryData = match serde_json::from_value(raw.clone()) {
        Ok(d) => d,
        Err(e) => return Ok(Err(invalid_payload(&e))),
    };

    let user = match &data.user {
        Some(raw_user) => rewrite_user(db, resolver, raw_user).await?,
        None => json!({"pk": null, "name": ""}),
    };
    let delete_comment_user = match &data.delete_comment_user {
        Some(raw_user) => Some(rewrite_user(db, resolver, raw_user).await?),
        None => None,
    };

    let diff = rewrite_diff(data.diff.unwrap_or_else(|| json!({})), statuses);
    let values = rewrite_values(data.values.unwrap_or_else(|| json!({})), statuses);
    let snapshot = match data.snapshot {
        Some(snapshot) => Some(rewrite_snapshot(db, resolver, snapshot, statuses).await?),
        None => None,
    };

    let model = history_entries::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        project_id: Set(ctx.project_id),
        key: Set(kind.history_key(object_id)),
        entry_type: Set(data.entry_type),
        user: Set(user),
        diff: Set(diff),
        snapshot: Set(snapshot),
        values: Set(values),
        comment: Set(data.comment),
        delete_comment_date: Set(data.delete_comment_date),
        delete_comment_user: Set(delete_comment_user),
        is_hidden: Set(data.is_hidden),
        is_snapshot: Set(data.is_snapshot),
        created_at: Set(data.created_at.unwrap_or_else(Utc::now)),
    }
    .insert(db)
    .await?;

    Ok(Ok(model))
}

/// Synthesize the creation snapshot for an object that arrived without any
/// history, so its timeline starts with a well-formed create entry.
pub async fn take_initial_snapshot<C: ConnectionTrait>(
    db: &C,
    ctx: &ImportContext,
    kind: ContentKind,
    object_id: i32,
    snapshot: Value,
    owner: &users::Model,
) -> Result<history_entries::Model> {
    let model = history_entries::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        project_id: Set(ctx.project_id),
        key: Set(kind.history_key(object_id)),
        entry_type: Set(HISTORY_TYPE_CREATE),
        user: Set(json!({"pk": owner.id, "name": owner.full_name})),
        diff: Set(json!({})),
        snapshot: Set(Some(snapshot)),
        values: Set(json!({})),
        comment: Set(String::new()),
        delete_comment_date: Set(None),
        delete_comment_user: Set(None),
        is_hidden: Set(false),
        is_snapshot: Set(true),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> HashMap<String, i32> {
        HashMap::from([("New".to_string(), 11), ("Done".to_string(), 12)])
    }

    #[test]
    fn test_rewrite_diff_status_names() {
        let diff = rewrite_diff(json!({"status": ["New", "Done"], "subject": ["a", "b"]}), &statuses());
        assert_eq!(diff["status"], json!([11, 12]));
        assert_eq!(diff["subject"], json!(["a", "b"]));
    }

    #[test]
    fn test_rewrite_diff_unknown_status_becomes_null() {
        let diff = rewrite_diff(json!({"status": ["New", "Archived"]}), &statuses());
        assert_eq!(diff["status"], json!([11, null]));
    }

    #[test]
    fn test_rewrite_values_keys_by_id() {
        let values = rewrite_values(json!({"status": {"New": "New", "Done": "Done"}}), &statuses());
        assert_eq!(values["status"]["11"], json!("New"));
        assert_eq!(values["status"]["12"], json!("Done"));
    }

    #[test]
    fn test_rewrite_non_object_passes_through() {
        assert_eq!(rewrite_diff(json!(null), &statuses()), json!(null));
        assert_eq!(rewrite_values(json!([1]), &statuses()), json!([1]));
    }

    #[tokio::test]
    async fn test_rewrite_snapshot_status_and_users() {
        use crate::database::test_utils::setup_test_db;
        use crate::services::users::create_user;

        let db = setup_test_db().await;
        let dev = create_user(&db, "dev@x", "Dev").await.unwrap();
        let mut resolver = Resolver::new();

        let snap = rewrite_snapshot(
            &db,
            &mut resolver,
            json!({"status": "Done", "owner": "dev@x", "assigned_to": "ghost@x", "subject": "s"}),
            &statuses(),
        )
        .await
        .unwrap();

        assert_eq!(snap["status"], json!(12));
        assert_eq!(snap["owner"], json!(dev.id));
        assert_eq!(snap["assigned_to"], json!(null));
        assert_eq!(snap["subject"], json!("s"));
    }
}
