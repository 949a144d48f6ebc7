//! Project aggregate counters (fans and activity), recomputed in one pass.

use anyhow::Result;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::database::entities::{project_fans, projects, timeline_entries};

/// Recount fan and timeline rows in the 7/30/365-day windows ending now and
/// persist the project once.
pub async fn refresh_totals<C: ConnectionTrait>(
    db: &C,
    project: projects::Model,
) -> Result<projects::Model> {
    let now = Utc::now();
    let week_ago = now - Duration::days(7);
    let month_ago = now - Duration::days(30);
    let year_ago = now - Duration::days(365);

    let fans = project_fans::Entity::find()
        .filter(project_fans::Column::ProjectId.eq(project.id));
    let total_fans = fans.clone().count(db).await? as i64;
    let total_fans_last_week = fans
        .clone()
        .filter(project_fans::Column::CreatedDate.gte(week_ago))
        .count(db)
        .await? as i64;
    let total_fans_last_month = fans
        .clone()
        .filter(project_fans::Column::CreatedDate.gte(month_ago))
        .count(db)
        .await? as i64;
    let total_fans_last_year = fans
        .filter(project_fans::Column::CreatedDate.gte(year_ago))
        .count(db)
        .await? as i64;

    let activity = timeline_entries::Entity::find()
        .filter(timeline_entries::Column::ProjectId.eq(project.id));
    let total_activity = activity.clone().count(db).await? as i64;
    let total_activity_last_week = activity
        .clone()
        .filter(timeline_entries::Column::CreatedAt.gte(week_ago))
        .count(db)
        .await? as i64;
    let total_activity_last_month = activity
        .clone()
        .filter(timeline_entries::Column::CreatedAt.gte(month_ago))
        .count(db)
        .await? as i64;
    let total_activity_last_year = activity
        .filter(timeline_entries::Column::CreatedAt.gte(year_ago))
        .count(db)
        .await? as i64;

    let mut active: projects::ActiveModel = project.into();
    active.total_fans = Set(total_fans);
    active.total_fans_last_week = Set(total_fans_last_week);
    active.total_fans_last_month = Set(total_fans_last_month);
    active.total_fans_last_year = Set(total_fans_last_year);
    active.total_activity = Set(total_activity);
    active.total_activity_last_week = Set(total_activity_last_week);
    active.total_activity_last_month = Set(total_activity_last_month);
    active.total_activity_last_year = Set(total_activity_last_year);
    active.totals_updated_datetime = Set(now);

    Ok(active.update(db).await?)
}
