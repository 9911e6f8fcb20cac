//! Version chain links, one row per version of a root entity

use crate::versioning::{ChainRecord, VersionNumber};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "versionings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub unific_root_id: i32,
    /// Never points to a newer version
    pub previous_version_id: Option<i32>,
    pub version_major: i32,
    pub version_minor: i32,
    /// Superseded drafts are kept but skipped
    pub ignored: bool,
    pub created: DateTime,
}

impl Model {
    pub fn version(&self) -> VersionNumber {
        VersionNumber::new(self.version_major, self.version_minor)
    }

    pub fn chain_record(&self) -> ChainRecord {
        ChainRecord {
            id: self.id,
            previous_id: self.previous_version_id,
            version: self.version(),
            created: self.created,
        }
    }
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
    #[sea_orm(has_many = "super::versioned_entities::Entity")]
    VersionedEntities,
}

impl Related<super::roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Root.def()
    }
}

impl Related<super::versioned_entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VersionedEntities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
