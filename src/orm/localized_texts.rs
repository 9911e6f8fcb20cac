//! Names and descriptions of a versioned row, one per language and type

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    #[sea_orm(string_value = "name")]
    Name,
    #[sea_orm(string_value = "alternate_name")]
    AlternateName,
    #[sea_orm(string_value = "short_description")]
    ShortDescription,
    #[sea_orm(string_value = "description")]
    Description,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "localized_texts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub versioned_id: i32,
    pub language: String,
    pub text_type: TextType,
    #[sea_orm(column_type = "Text")]
    pub value: String,
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
