//! Test fixtures for creating test data
#![allow(dead_code)]
#![allow(clippy::needless_update)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use ptv::lifecycle::{self, DraftInput, PublishRequest, TextInput, VersionView};
use ptv::orm::localized_texts::TextType;
use ptv::orm::roots::EntityKind;
use ptv::orm::{postal_codes, service_channel_connections};
use sea_orm::{entity::*, ActiveValue::Set, DatabaseConnection, DbErr};

pub const EDITOR: &str = "editor";

/// Fixed reference time so tests do not depend on the clock.
pub fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn at(hours: i64) -> NaiveDateTime {
    t0() + Duration::hours(hours)
}

pub fn text(language: &str, text_type: TextType, value: &str) -> TextInput {
    TextInput {
        language: language.to_string(),
        text_type,
        value: value.to_string(),
    }
}

/// Draft content with a name in each of `languages`.
pub fn named_draft(name: &str, languages: &[&str]) -> DraftInput {
    DraftInput {
        organization_id: None,
        texts: languages
            .iter()
            .map(|l| text(l, TextType::Name, &format!("{} ({})", name, l)))
            .collect(),
        data: serde_json::json!({ "name": name }),
        user: EDITOR.to_string(),
    }
}

pub fn publish_now(languages: &[&str]) -> PublishRequest {
    PublishRequest {
        languages: languages.iter().map(|l| l.to_string()).collect(),
        publish_at: None,
        archive_at: None,
        user: EDITOR.to_string(),
    }
}

pub async fn create_service(db: &DatabaseConnection, name: &str, languages: &[&str]) -> VersionView {
    lifecycle::create_root(db, EntityKind::Service, &named_draft(name, languages), t0())
        .await
        .expect("Failed to create service")
}

pub async fn create_channel(db: &DatabaseConnection, name: &str) -> VersionView {
    lifecycle::create_root(
        db,
        EntityKind::ServiceChannel,
        &named_draft(name, &["fi"]),
        t0(),
    )
    .await
    .expect("Failed to create channel")
}

/// Create a service and publish its first version in all its languages.
pub async fn create_published_service(
    db: &DatabaseConnection,
    name: &str,
    languages: &[&str],
) -> VersionView {
    let draft = create_service(db, name, languages).await;
    lifecycle::publish(db, draft.id, &publish_now(&[]), t0())
        .await
        .expect("Failed to publish service")
}

pub async fn insert_postal_code(db: &DatabaseConnection, code: &str) -> Result<postal_codes::Model, DbErr> {
    postal_codes::ActiveModel {
        code: Set(code.to_string()),
        municipality_code: Set(Some("091".to_string())),
        center_x: Set(None),
        center_y: Set(None),
        coordinate_state: Set(postal_codes::CoordinateState::NotFetched),
        modified: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Connection row as left behind before the order split.
pub async fn insert_legacy_connection(
    db: &DatabaseConnection,
    service_root_id: i32,
    channel_root_id: i32,
    legacy_order: Option<i32>,
    created: NaiveDateTime,
) -> Result<service_channel_connections::Model, DbErr> {
    service_channel_connections::ActiveModel {
        service_root_id: Set(service_root_id),
        channel_root_id: Set(channel_root_id),
        legacy_order_number: Set(legacy_order),
        service_order_number: Set(None),
        channel_order_number: Set(None),
        created: Set(created),
        ..Default::default()
    }
    .insert(db)
    .await
}
