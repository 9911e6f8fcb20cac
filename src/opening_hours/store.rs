use super::{weekday_from_index, weekday_index, DailyOpeningTime, ServiceHours};
use crate::app_config;
use crate::lifecycle::LifecycleError;
use crate::orm::roots::EntityKind;
use crate::orm::{daily_opening_times, service_hours, versioned_entities};
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr};

/// Opening hours of a versioned row in their stored order.
pub async fn load_opening_hours<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
) -> Result<Vec<ServiceHours>, DbErr> {
    let blocks = service_hours::Entity::find()
        .filter(service_hours::Column::VersionedId.eq(versioned_id))
        .order_by_asc(service_hours::Column::OrderNumber)
        .order_by_asc(service_hours::Column::Id)
        .find_with_related(daily_opening_times::Entity)
        .all(db)
        .await?;

    Ok(blocks
        .into_iter()
        .map(|(block, mut times)| {
            times.sort_by_key(|t| (t.day_from, t.order_number, t.from_time));
            ServiceHours {
                hours_type: block.hours_type,
                valid_from: block.valid_from,
                valid_to: block.valid_to,
                is_closed: block.is_closed,
                valid_for_now: block.valid_for_now,
                order_number: block.order_number,
                additional_information: block.additional_information,
                daily: times
                    .into_iter()
                    .filter_map(|t| {
                        Some(DailyOpeningTime {
                            day_from: weekday_from_index(t.day_from)?,
                            day_to: t.day_to.and_then(weekday_from_index),
                            from: t.from_time,
                            to: t.to_time,
                            order_number: t.order_number,
                        })
                    })
                    .collect(),
            }
        })
        .collect())
}

/// Replace every opening hours block of a draft channel version.
pub async fn replace_opening_hours(
    db: &DatabaseConnection,
    versioned_id: i32,
    hours: &[ServiceHours],
) -> Result<Vec<ServiceHours>, LifecycleError> {
    super::validate_all(hours, app_config::opening_hours().max_intervals_per_day)?;

    let txn = db.begin().await?;
    let row = versioned_entities::Entity::find_by_id(versioned_id)
        .one(&txn)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("version {}", versioned_id)))?;
    if row.kind != EntityKind::ServiceChannel {
        return Err(LifecycleError::Validation(format!(
            "version {} is not a service channel",
            versioned_id
        )));
    }
    if !row.publishing_status.is_draft_like() {
        return Err(LifecycleError::Conflict(format!(
            "version {} is {}, opening hours can only change on drafts",
            versioned_id, row.publishing_status
        )));
    }

    delete_service_hours(&txn, versioned_id).await?;
    for block in hours {
        insert_block(&txn, versioned_id, block).await?;
    }
    let stored = load_opening_hours(&txn, versioned_id).await?;
    txn.commit().await?;

    log::info!(
        "Replaced opening hours of version {} with {} block(s)",
        versioned_id,
        stored.len()
    );
    Ok(stored)
}

/// Copy the opening hours of one version onto a new one.
pub async fn copy_service_hours<C: ConnectionTrait>(
    db: &C,
    from_versioned_id: i32,
    to_versioned_id: i32,
) -> Result<(), DbErr> {
    for block in load_opening_hours(db, from_versioned_id).await? {
        insert_block(db, to_versioned_id, &block).await?;
    }
    Ok(())
}

async fn delete_service_hours<C: ConnectionTrait>(db: &C, versioned_id: i32) -> Result<(), DbErr> {
    let ids: Vec<i32> = service_hours::Entity::find()
        .filter(service_hours::Column::VersionedId.eq(versioned_id))
        .all(db)
        .await?
        .into_iter()
        .map(|h| h.id)
        .collect();
    if ids.is_empty() {
        return Ok(());
    }

    daily_opening_times::Entity::delete_many()
        .filter(daily_opening_times::Column::ServiceHoursId.is_in(ids.clone()))
        .exec(db)
        .await?;
    service_hours::Entity::delete_many()
        .filter(service_hours::Column::Id.is_in(ids))
        .exec(db)
        .await?;
    Ok(())
}

async fn insert_block<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
    block: &ServiceHours,
) -> Result<(), DbErr> {
    let stored = service_hours::ActiveModel {
        versioned_id: Set(versioned_id),
        hours_type: Set(block.hours_type),
        valid_from: Set(block.valid_from),
        valid_to: Set(block.valid_to),
        is_closed: Set(block.is_closed),
        valid_for_now: Set(block.valid_for_now),
        order_number: Set(block.order_number),
        additional_information: Set(block.additional_information.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    for time in &block.daily {
        daily_opening_times::ActiveModel {
            service_hours_id: Set(stored.id),
            day_from: Set(weekday_index(time.day_from)),
            day_to: Set(time.day_to.map(weekday_index)),
            from_time: Set(time.from),
            to_time: Set(time.to),
            order_number: Set(time.order_number),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }
    Ok(())
}
