//! Read models of versioned rows

use super::LifecycleError;
use crate::orm::localized_texts::TextType;
use crate::orm::roots::EntityKind;
use crate::orm::{language_availabilities, localized_texts, versioned_entities, versionings};
use crate::versioning::{Availability, PublishingStatus};
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, ConnectionTrait};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextView {
    pub language: String,
    pub text_type: TextType,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageView {
    pub language: String,
    #[serde(flatten)]
    pub availability: Availability,
}

/// A versioned row with its version number, texts and language states.
#[derive(Debug, Clone, Serialize)]
pub struct VersionView {
    pub id: i32,
    pub root_id: i32,
    pub kind: EntityKind,
    pub version: String,
    pub versioning_id: i32,
    pub previous_version_id: Option<i32>,
    pub ignored: bool,
    pub original_id: Option<i32>,
    pub status: PublishingStatus,
    pub organization_id: Option<i32>,
    pub data: serde_json::Value,
    pub texts: Vec<TextView>,
    pub languages: Vec<LanguageView>,
    pub created: NaiveDateTime,
    pub created_by: String,
    pub modified: NaiveDateTime,
    pub modified_by: String,
}

impl VersionView {
    pub fn language(&self, code: &str) -> Option<&Availability> {
        self.languages
            .iter()
            .find(|l| l.language == code)
            .map(|l| &l.availability)
    }

    pub fn text(&self, code: &str, text_type: TextType) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.language == code && t.text_type == text_type)
            .map(|t| t.value.as_str())
    }
}

/// Load the view of one versioned row.
pub async fn get_version<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
) -> Result<VersionView, LifecycleError> {
    let row = versioned_entities::Entity::find_by_id(versioned_id)
        .one(db)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("version {}", versioned_id)))?;
    build_view(db, row).await
}

pub(crate) async fn build_view<C: ConnectionTrait>(
    db: &C,
    row: versioned_entities::Model,
) -> Result<VersionView, LifecycleError> {
    let versioning = versionings::Entity::find_by_id(row.versioning_id)
        .one(db)
        .await?
        .ok_or_else(|| {
            LifecycleError::NotFound(format!(
                "versioning {} of version {}",
                row.versioning_id, row.id
            ))
        })?;

    let texts = localized_texts::Entity::find()
        .filter(localized_texts::Column::VersionedId.eq(row.id))
        .order_by_asc(localized_texts::Column::Language)
        .order_by_asc(localized_texts::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|t| TextView {
            language: t.language,
            text_type: t.text_type,
            value: t.value,
        })
        .collect();

    let languages = language_availabilities::Entity::find()
        .filter(language_availabilities::Column::VersionedId.eq(row.id))
        .order_by_asc(language_availabilities::Column::Language)
        .all(db)
        .await?
        .into_iter()
        .map(|la| LanguageView {
            availability: la.availability(),
            language: la.language,
        })
        .collect();

    let data = serde_json::from_str(&row.data).unwrap_or(serde_json::Value::Null);

    Ok(VersionView {
        id: row.id,
        root_id: row.unific_root_id,
        kind: row.kind,
        version: versioning.version().to_string(),
        versioning_id: versioning.id,
        previous_version_id: versioning.previous_version_id,
        ignored: versioning.ignored,
        original_id: row.original_id,
        status: row.publishing_status,
        organization_id: row.organization_id,
        data,
        texts,
        languages,
        created: row.created,
        created_by: row.created_by,
        modified: row.modified,
        modified_by: row.modified_by,
    })
}
