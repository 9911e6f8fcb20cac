//! Links between services and service channels

use crate::jobs::connection_order::next_order;
use crate::lifecycle::{find_root, LifecycleError};
use crate::orm::roots::EntityKind;
use crate::orm::service_channel_connections as connections;
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection};

/// Connect a service to a channel, last in both orders.
pub async fn connect(
    db: &DatabaseConnection,
    service_root_id: i32,
    channel_root_id: i32,
    now: NaiveDateTime,
) -> Result<connections::Model, LifecycleError> {
    let txn = db.begin().await?;
    expect_kind(&txn, service_root_id, EntityKind::Service).await?;
    expect_kind(&txn, channel_root_id, EntityKind::ServiceChannel).await?;

    let existing = connections::Entity::find()
        .filter(connections::Column::ServiceRootId.eq(service_root_id))
        .filter(connections::Column::ChannelRootId.eq(channel_root_id))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(LifecycleError::Conflict(format!(
            "service {} is already connected to channel {}",
            service_root_id, channel_root_id
        )));
    }

    let service_order = next_order(
        connections::Entity::find()
            .filter(connections::Column::ServiceRootId.eq(service_root_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.service_order_number),
    );
    let channel_order = next_order(
        connections::Entity::find()
            .filter(connections::Column::ChannelRootId.eq(channel_root_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|c| c.channel_order_number),
    );

    let connection = connections::ActiveModel {
        service_root_id: Set(service_root_id),
        channel_root_id: Set(channel_root_id),
        legacy_order_number: Set(None),
        service_order_number: Set(Some(service_order)),
        channel_order_number: Set(Some(channel_order)),
        created: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    log::info!(
        "Connected service {} to channel {}",
        service_root_id,
        channel_root_id
    );
    Ok(connection)
}

/// Channels of a service in the service's order.
pub async fn connections_for_service<C: ConnectionTrait>(
    db: &C,
    service_root_id: i32,
) -> Result<Vec<connections::Model>, LifecycleError> {
    expect_kind(db, service_root_id, EntityKind::Service).await?;
    let mut rows = connections::Entity::find()
        .filter(connections::Column::ServiceRootId.eq(service_root_id))
        .all(db)
        .await?;
    rows.sort_by_key(|c| (c.service_order_number.is_none(), c.service_order_number, c.id));
    Ok(rows)
}

/// Services of a channel in the channel's order.
pub async fn connections_for_channel<C: ConnectionTrait>(
    db: &C,
    channel_root_id: i32,
) -> Result<Vec<connections::Model>, LifecycleError> {
    expect_kind(db, channel_root_id, EntityKind::ServiceChannel).await?;
    let mut rows = connections::Entity::find()
        .filter(connections::Column::ChannelRootId.eq(channel_root_id))
        .all(db)
        .await?;
    rows.sort_by_key(|c| (c.channel_order_number.is_none(), c.channel_order_number, c.id));
    Ok(rows)
}

async fn expect_kind<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
    kind: EntityKind,
) -> Result<(), LifecycleError> {
    let root = find_root(db, root_id).await?;
    if root.kind != kind {
        return Err(LifecycleError::Validation(format!(
            "root {} is a {:?}, expected {:?}",
            root_id, root.kind, kind
        )));
    }
    Ok(())
}
