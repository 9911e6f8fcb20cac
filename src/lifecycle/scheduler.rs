//! Periodic sweep that carries out scheduled publications and archivals

use super::{ArchiveRequest, LifecycleError, PublishRequest};
use crate::orm::{language_availabilities, versioned_entities, versionings};
use crate::versioning::PublishingStatus;
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, DatabaseConnection};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;

const SCHEDULER_USER: &str = "scheduler";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub published: usize,
    pub archived: usize,
    pub failed: usize,
}

/// Publish and archive every language row whose scheduled time has passed.
///
/// A failure on one row is recorded on that row and the sweep continues. A
/// row that failed is retried only after it is rescheduled.
pub async fn run_due(
    db: &DatabaseConnection,
    now: NaiveDateTime,
) -> Result<SweepReport, LifecycleError> {
    let mut report = SweepReport::default();

    let ignored = ignored_versioned_ids(db).await?;
    let due_publish = language_availabilities::Entity::find()
        .filter(
            language_availabilities::Column::Status
                .is_in([PublishingStatus::Draft, PublishingStatus::Modified]),
        )
        .filter(language_availabilities::Column::PublishAt.lte(now))
        .order_by_asc(language_availabilities::Column::PublishAt)
        .all(db)
        .await?;

    for la in due_publish {
        if ignored.contains(&la.versioned_id) {
            continue;
        }
        let state = la.availability();
        if !state.is_publish_due(now) {
            continue;
        }
        if matches!(
            (state.last_failed_publish_at, state.publish_at),
            (Some(failed), Some(at)) if failed >= at
        ) {
            continue;
        }

        let request = PublishRequest {
            languages: vec![la.language.clone()],
            publish_at: state.publish_at,
            archive_at: None,
            user: SCHEDULER_USER.to_string(),
        };
        match super::publish(db, la.versioned_id, &request, now).await {
            Ok(_) => report.published += 1,
            Err(LifecycleError::Database(e)) => return Err(LifecycleError::Database(e)),
            Err(e) => {
                log::warn!(
                    "Scheduled publish of version {} in '{}' failed: {}",
                    la.versioned_id,
                    la.language,
                    e
                );
                super::record_failed_publish(db, la.versioned_id, &la.language, now).await?;
                report.failed += 1;
            }
        }
    }

    let due_archive = language_availabilities::Entity::find()
        .filter(language_availabilities::Column::Status.is_in([
            PublishingStatus::Draft,
            PublishingStatus::Modified,
            PublishingStatus::Published,
        ]))
        .filter(language_availabilities::Column::ArchiveAt.lte(now))
        .order_by_asc(language_availabilities::Column::ArchiveAt)
        .all(db)
        .await?;

    for la in due_archive {
        if ignored.contains(&la.versioned_id) {
            log::debug!("Version {} was replaced, archive skipped", la.versioned_id);
            continue;
        }
        if !la.availability().is_archive_due(now) {
            continue;
        }
        let request = ArchiveRequest {
            languages: vec![la.language.clone()],
            archive_at: None,
            user: la
                .set_for_archived_by
                .clone()
                .unwrap_or_else(|| SCHEDULER_USER.to_string()),
        };
        match super::archive(db, la.versioned_id, &request, now).await {
            Ok(_) => report.archived += 1,
            Err(LifecycleError::Database(e)) => return Err(LifecycleError::Database(e)),
            Err(e) => {
                log::warn!(
                    "Scheduled archive of version {} in '{}' failed: {}",
                    la.versioned_id,
                    la.language,
                    e
                );
                report.failed += 1;
            }
        }
    }

    if report != SweepReport::default() {
        log::info!(
            "Scheduler sweep: {} published, {} archived, {} failed",
            report.published,
            report.archived,
            report.failed
        );
    }
    Ok(report)
}

/// Run [`run_due`] forever on the actix runtime.
pub fn spawn(db: DatabaseConnection, interval: Duration) {
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(interval);
        loop {
            interval.tick().await;
            let now = chrono::Utc::now().naive_utc();
            if let Err(e) = run_due(&db, now).await {
                log::error!("Scheduler sweep failed: {}", e);
            }
        }
    });
}

async fn ignored_versioned_ids(db: &DatabaseConnection) -> Result<HashSet<i32>, LifecycleError> {
    let ignored: Vec<i32> = versionings::Entity::find()
        .filter(versionings::Column::Ignored.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|v| v.id)
        .collect();
    if ignored.is_empty() {
        return Ok(HashSet::new());
    }

    Ok(versioned_entities::Entity::find()
        .filter(versioned_entities::Column::VersioningId.is_in(ignored))
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.id)
        .collect())
}
