//! Watcher bookkeeping (the notification-service surface the importer uses).

use anyhow::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::common::ContentKind;
use crate::database::entities::{users, watchers};

pub async fn add_watcher<C: ConnectionTrait>(
    db: &C,
    project_id: i32,
    kind: ContentKind,
    object_id: i32,
    user: &users::Model,
) -> Result<()> {
    let existing = watchers::Entity::find()
        .filter(watchers::Column::ContentKind.eq(kind.natural_key()))
        .filter(watchers::Column::ObjectId.eq(object_id))
        .filter(watchers::Column::UserId.eq(user.id))
        .one(db)
        .await?;

    if existing.is_none() {
        watchers::ActiveModel {
            project_id: Set(project_id),
            content_kind: Set(kind.natural_key().to_string()),
            object_id: Set(object_id),
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    Ok(())
}

pub async fn get_watcher_ids<C: ConnectionTrait>(
    db: &C,
    kind: ContentKind,
    object_id: i32,
) -> Result<Vec<i32>> {
    let rows = watchers::Entity::find()
        .filter(watchers::Column::ContentKind.eq(kind.natural_key()))
        .filter(watchers::Column::ObjectId.eq(object_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|w| w.user_id).collect())
}
