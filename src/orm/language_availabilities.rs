//! Per-language publication state of a versioned row

use crate::versioning::{Availability, PublishingStatus};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "language_availabilities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub versioned_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub language: String,
    pub status: PublishingStatus,
    pub publish_at: Option<DateTime>,
    pub archive_at: Option<DateTime>,
    pub reviewed: Option<DateTime>,
    pub reviewed_by: Option<String>,
    pub set_for_archived: Option<DateTime>,
    pub set_for_archived_by: Option<String>,
    pub last_failed_publish_at: Option<DateTime>,
    pub modified: DateTime,
}

impl Model {
    pub fn availability(&self) -> Availability {
        Availability {
            status: self.status,
            publish_at: self.publish_at,
            archive_at: self.archive_at,
            reviewed: self.reviewed,
            reviewed_by: self.reviewed_by.clone(),
            set_for_archived: self.set_for_archived,
            set_for_archived_by: self.set_for_archived_by.clone(),
            last_failed_publish_at: self.last_failed_publish_at,
        }
    }
}

impl ActiveModel {
    /// Active model for a new row carrying `state`.
    pub fn new_row(
        versioned_id: i32,
        language: &str,
        state: &Availability,
        modified: DateTime,
    ) -> Self {
        let mut row = Self {
            versioned_id: Set(versioned_id),
            language: Set(language.to_string()),
            ..Default::default()
        };
        row.apply(state, modified);
        row
    }

    /// Mark every state column of `state` as changed.
    pub fn apply(&mut self, state: &Availability, modified: DateTime) {
        self.status = Set(state.status);
        self.publish_at = Set(state.publish_at);
        self.archive_at = Set(state.archive_at);
        self.reviewed = Set(state.reviewed);
        self.reviewed_by = Set(state.reviewed_by.clone());
        self.set_for_archived = Set(state.set_for_archived);
        self.set_for_archived_by = Set(state.set_for_archived_by.clone());
        self.last_failed_publish_at = Set(state.last_failed_publish_at);
        self.modified = Set(modified);
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::versioned_entities::Entity",
        from = "Column::VersionedId",
        to = "super::versioned_entities::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    VersionedEntity,
}

impl Related<super::versioned_entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VersionedEntity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
