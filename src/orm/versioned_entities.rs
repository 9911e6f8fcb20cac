//! Versioned snapshots of root entities

use crate::versioning::PublishingStatus;
use sea_orm::entity::prelude::*;

use super::roots::EntityKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "versioned_entities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub unific_root_id: i32,
    /// Must match the kind of the root
    pub kind: EntityKind,
    pub versioning_id: i32,
    /// The row this version was cloned from
    pub original_id: Option<i32>,
    pub publishing_status: PublishingStatus,
    /// Owning organization (root id)
    pub organization_id: Option<i32>,
    /// Kind-specific business fields as a JSON document
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub created: DateTime,
    pub created_by: String,
    pub modified: DateTime,
    pub modified_by: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roots::Entity",
        from = "Column::UnificRootId",
        to = "super::roots::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Root,
    #[sea_orm(
        belongs_to = "super::versionings::Entity",
        from = "Column::VersioningId",
        to = "super::versionings::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Versioning,
    #[sea_orm(has_many = "super::localized_texts::Entity")]
    LocalizedTexts,
    #[sea_orm(has_many = "super::language_availabilities::Entity")]
    LanguageAvailabilities,
    #[sea_orm(has_many = "super::service_hours::Entity")]
    ServiceHours,
}

impl Related<super::roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Root.def()
    }
}

impl Related<super::versionings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Versioning.def()
    }
}

impl Related<super::localized_texts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LocalizedTexts.def()
    }
}

impl Related<super::language_availabilities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LanguageAvailabilities.def()
    }
}

impl Related<super::service_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceHours.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
