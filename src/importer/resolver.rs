//! Memoized name-to-row resolution, scoped to one import.
//!
//! Every lookup is cached for the lifetime of the resolver, including
//! misses. Lookups for a given table only happen after the importer has
//! finished inserting into that table, so the cache never goes stale within
//! an import.

use std::collections::HashMap;

use anyhow::Result;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::database::entities::project_attributes::AttributeKind;
use crate::database::entities::{custom_attributes, milestones, project_attributes, roles, users};

#[derive(Debug, Default)]
pub struct Resolver {
    users_by_email: HashMap<String, Option<users::Model>>,
    users_by_pk: HashMap<i32, Option<users::Model>>,
    roles_by_name: HashMap<(i32, String), Option<i32>>,
    milestones_by_name: HashMap<(i32, String), Option<i32>>,
    attributes: HashMap<(i32, AttributeKind), Vec<(i32, String)>>,
    custom_attributes: HashMap<(i32, String), Vec<(i32, String)>>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive email lookup. When several rows fold to the same
    /// lowercase email, an exact-case match wins, otherwise the first row.
    pub async fn user_by_email<C: ConnectionTrait>(
        &mut self,
        db: &C,
        email: &str,
    ) -> Result<Option<users::Model>> {
        let key = email.to_lowercase();
        if let Some(hit) = self.users_by_email.get(&key) {
            return Ok(hit.clone());
        }

        let candidates = users::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(users::Column::Email))).eq(key.clone()))
            .all(db)
            .await?;
        let found = candidates
            .iter()
            .find(|u| u.email == email)
            .or_else(|| candidates.first())
            .cloned();

        self.users_by_email.insert(key, found.clone());
        Ok(found)
    }

    pub async fn user_by_pk<C: ConnectionTrait>(
        &mut self,
        db: &C,
        pk: i32,
    ) -> Result<Option<users::Model>> {
        if let Some(hit) = self.users_by_pk.get(&pk) {
            return Ok(hit.clone());
        }
        let found = users::Entity::find_by_id(pk).one(db).await?;
        self.users_by_pk.insert(pk, found.clone());
        Ok(found)
    }

    pub async fn role_id<C: ConnectionTrait>(
        &mut self,
        db: &C,
        project_id: i32,
        name: &str,
    ) -> Result<Option<i32>> {
        let key = (project_id, name.to_string());
        if let Some(hit) = self.roles_by_name.get(&key) {
            return Ok(*hit);
        }

        let found = roles::Entity::find()
            .filter(roles::Column::ProjectId.eq(project_id))
            .filter(roles::Column::Name.eq(name))
            .one(db)
            .await?
            .map(|r| r.id);
        self.roles_by_name.insert(key, found);
        Ok(found)
    }

    pub async fn milestone_id<C: ConnectionTrait>(
        &mut self,
        db: &C,
        project_id: i32,
        name: &str,
    ) -> Result<Option<i32>> {
        let key = (project_id, name.to_string());
        if let Some(hit) = self.milestones_by_name.get(&key) {
            return Ok(*hit);
        }

        let found = milestones::Entity::find()
            .filter(milestones::Column::ProjectId.eq(project_id))
            .filter(milestones::Column::Name.eq(name))
            .one(db)
            .await?
            .map(|m| m.id);
        self.milestones_by_name.insert(key, found);
        Ok(found)
    }

    /// `(id, name)` pairs for one enumeration kind, in definition order.
    pub async fn attribute_index<C: ConnectionTrait>(
        &mut self,
        db: &C,
        project_id: i32,
        kind: AttributeKind,
    ) -> Result<&[(i32, String)]> {
        let key = (project_id, kind);
        if !self.attributes.contains_key(&key) {
            let rows = project_attributes::Entity::find()
                .filter(project_attributes::Column::ProjectId.eq(project_id))
                .filter(project_attributes::Column::Kind.eq(kind.as_str()))
                .order_by_asc(project_attributes::Column::Order)
                .order_by_asc(project_attributes::Column::Id)
                .all(db)
                .await?;
            self.attributes
                .insert(key, rows.into_iter().map(|a| (a.id, a.name)).collect());
        }
        Ok(self.attributes[&key].as_slice())
    }

    pub async fn attribute_id<C: ConnectionTrait>(
        &mut self,
        db: &C,
        project_id: i32,
        kind: AttributeKind,
        name: &str,
    ) -> Result<Option<i32>> {
        let index = self.attribute_index(db, project_id, kind).await?;
        Ok(index.iter().find(|(_, n)| n == name).map(|(id, _)| *id))
    }

    /// `(id, name)` pairs of the custom attribute definitions for one
    /// work-item kind.
    pub async fn custom_attribute_index<C: ConnectionTrait>(
        &mut self,
        db: &C,
        project_id: i32,
        kind: &str,
    ) -> Result<&[(i32, String)]> {
        let key = (project_id, kind.to_string());
        if !self.custom_attributes.contains_key(&key) {
            let rows = custom_attributes::Entity::find()
                .filter(custom_attributes::Column::ProjectId.eq(project_id))
                .filter(custom_attributes::Column::Kind.eq(kind))
                .order_by_asc(custom_attributes::Column::Order)
                .order_by_asc(custom_attributes::Column::Id)
                .all(db)
                .await?;
            self.custom_attributes
                .insert(key.clone(), rows.into_iter().map(|a| (a.id, a.name)).collect());
        }
        Ok(self.custom_attributes[&key].as_slice())
    }
}
