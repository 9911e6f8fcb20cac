//! Split of the combined connection order into per-service and per-channel orders

use crate::orm::service_channel_connections as connections;
use sea_orm::{entity::*, query::*, Condition, DatabaseConnection, DbErr};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub updated: usize,
    pub batches: usize,
}

/// Fill `service_order_number` and `channel_order_number` of every
/// connection that does not have both yet.
///
/// The service order is the legacy order. The channel order is the position
/// of the connection among all connections of its channel, ranked by legacy
/// order, creation time and id. Rows lacking a legacy order are ranked last
/// within their service too.
pub async fn split_connection_order(
    db: &DatabaseConnection,
    batch_size: u64,
) -> Result<SplitReport, DbErr> {
    let batch_size = batch_size.max(1);
    let mut report = SplitReport::default();
    let mut after = 0;

    loop {
        let batch = connections::Entity::find()
            .filter(connections::Column::Id.gt(after))
            .filter(
                Condition::any()
                    .add(connections::Column::ServiceOrderNumber.is_null())
                    .add(connections::Column::ChannelOrderNumber.is_null()),
            )
            .order_by_asc(connections::Column::Id)
            .limit(batch_size)
            .all(db)
            .await?;
        let Some(last) = batch.last() else {
            break;
        };
        after = last.id;
        let short = (batch.len() as u64) < batch_size;

        let txn = db.begin().await?;
        let service_ids: BTreeSet<i32> = batch.iter().map(|c| c.service_root_id).collect();
        let channel_ids: BTreeSet<i32> = batch.iter().map(|c| c.channel_root_id).collect();

        let service_ranks = ranks(
            connections::Entity::find()
                .filter(connections::Column::ServiceRootId.is_in(service_ids))
                .all(&txn)
                .await?,
            |c| c.service_root_id,
        );
        let channel_ranks = ranks(
            connections::Entity::find()
                .filter(connections::Column::ChannelRootId.is_in(channel_ids))
                .all(&txn)
                .await?,
            |c| c.channel_root_id,
        );

        for connection in batch {
            let id = connection.id;
            let service_order = connection
                .service_order_number
                .or(connection.legacy_order_number)
                .or_else(|| service_ranks.get(&id).copied());
            let channel_order = connection
                .channel_order_number
                .or_else(|| channel_ranks.get(&id).copied());

            let mut active: connections::ActiveModel = connection.into();
            active.service_order_number = Set(service_order);
            active.channel_order_number = Set(channel_order);
            active.update(&txn).await?;
            report.updated += 1;
        }
        txn.commit().await?;
        report.batches += 1;

        log::info!("Connection order: {} connections split", report.updated);
        if short {
            break;
        }
    }

    Ok(report)
}

/// Zero-based position of every connection within its group.
fn ranks<F>(mut rows: Vec<connections::Model>, group: F) -> HashMap<i32, i32>
where
    F: Fn(&connections::Model) -> i32,
{
    rows.sort_by_key(|c| {
        (
            group(c),
            c.legacy_order_number.is_none(),
            c.legacy_order_number,
            c.created,
            c.id,
        )
    });

    let mut result = HashMap::with_capacity(rows.len());
    let mut current: Option<i32> = None;
    let mut position = 0;
    for row in &rows {
        if current != Some(group(row)) {
            current = Some(group(row));
            position = 0;
        }
        result.insert(row.id, position);
        position += 1;
    }
    result
}

/// Order number for a connection appended after `existing`.
pub(crate) fn next_order<I>(existing: I) -> i32
where
    I: IntoIterator<Item = Option<i32>>,
{
    existing
        .into_iter()
        .flatten()
        .max()
        .map_or(0, |max| max + 1)
}
