//! User lookups and the project-slot quota policy.

use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::database::entities::{projects, users};

pub async fn get_user_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<users::Model>> {
    let user = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(user)
}

pub async fn create_user<C: ConnectionTrait>(db: &C, email: &str, full_name: &str) -> Result<users::Model> {
    let user = users::ActiveModel {
        email: Set(email.to_string()),
        full_name: Set(full_name.to_string()),
        is_active: Set(true),
        date_joined: Set(Utc::now()),
        ..Default::default()
    };
    Ok(user.insert(db).await?)
}

/// An invitation becomes a membership when a user with that email exists.
pub async fn find_invited_user<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<users::Model>> {
    get_user_by_email(db, email).await
}

/// Whether `owner` can host one more project of the given privacy with
/// `total_memberships` members. Returns `(enough, reason)`; the reason is
/// empty when there is room. `None` limits mean unlimited.
pub async fn has_available_slot_for_new_project<C: ConnectionTrait>(
    db: &C,
    owner: &users::Model,
    is_private: bool,
    total_memberships: i64,
) -> Result<(bool, String)> {
    let current = projects::Entity::find()
        .filter(projects::Column::OwnerId.eq(owner.id))
        .filter(projects::Column::IsPrivate.eq(is_private))
        .count(db)
        .await? as i64;

    let (max_projects, max_memberships, visibility) = if is_private {
        (
            owner.max_private_projects,
            owner.max_memberships_private_projects,
            "private",
        )
    } else {
        (
            owner.max_public_projects,
            owner.max_memberships_public_projects,
            "public",
        )
    };

    if let Some(max) = max_projects {
        if current >= max as i64 {
            return Ok((
                false,
                format!("You can't have more than {} {} projects", max, visibility),
            ));
        }
    }

    if let Some(max) = max_memberships {
        if total_memberships > max as i64 {
            return Ok((
                false,
                format!(
                    "This project reaches your current limit of {} memberships for {} projects",
                    max, visibility
                ),
            ));
        }
    }

    Ok((true, String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_unlimited_owner_always_has_slot() {
        let db = setup_test_db().await;
        let owner = create_user(&db, "a@x", "A").await.unwrap();

        let (ok, reason) = has_available_slot_for_new_project(&db, &owner, true, 100)
            .await
            .unwrap();
        assert!(ok);
        assert!(reason.is_empty());
    }

    #[tokio::test]
    async fn test_membership_ceiling() {
        let db = setup_test_db().await;
        let mut owner: users::ActiveModel = create_user(&db, "a@x", "A").await.unwrap().into();
        owner.max_memberships_private_projects = Set(Some(3));
        let owner = owner.update(&db).await.unwrap();

        let (ok, reason) = has_available_slot_for_new_project(&db, &owner, true, 4)
            .await
            .unwrap();
        assert!(!ok);
        assert!(reason.contains("memberships"));

        let (ok, _) = has_available_slot_for_new_project(&db, &owner, true, 3)
            .await
            .unwrap();
        assert!(ok);
    }
}
