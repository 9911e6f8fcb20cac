//! Root entities: stable identities that every version hangs off

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    #[sea_orm(string_value = "service")]
    Service,
    #[sea_orm(string_value = "organization")]
    Organization,
    #[sea_orm(string_value = "service_channel")]
    ServiceChannel,
    #[sea_orm(string_value = "service_collection")]
    ServiceCollection,
    #[sea_orm(string_value = "general_description")]
    GeneralDescription,
}

impl EntityKind {
    /// Parse the plural form used in URLs.
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "services" => Some(EntityKind::Service),
            "organizations" => Some(EntityKind::Organization),
            "channels" => Some(EntityKind::ServiceChannel),
            "service-collections" => Some(EntityKind::ServiceCollection),
            "general-descriptions" => Some(EntityKind::GeneralDescription),
            _ => None,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            EntityKind::Service => "services",
            EntityKind::Organization => "organizations",
            EntityKind::ServiceChannel => "channels",
            EntityKind::ServiceCollection => "service-collections",
            EntityKind::GeneralDescription => "general-descriptions",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub kind: EntityKind,
    pub created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::versioned_entities::Entity")]
    VersionedEntities,
    #[sea_orm(has_many = "super::versionings::Entity")]
    Versionings,
}

impl Related<super::versioned_entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VersionedEntities.def()
    }
}

impl Related<super::versionings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Versionings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
