//! Opening hours blocks attached to a service channel version

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum ServiceHoursType {
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "special")]
    Special,
    #[sea_orm(string_value = "exceptional")]
    Exceptional,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "service_hours")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub versioned_id: i32,
    pub hours_type: ServiceHoursType,
    pub valid_from: Option<Date>,
    pub valid_to: Option<Date>,
    pub is_closed: bool,
    pub valid_for_now: bool,
    pub order_number: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_information: Option<String>,
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
    #[sea_orm(has_many = "super::daily_opening_times::Entity")]
    DailyOpeningTimes,
}

impl Related<super::versioned_entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VersionedEntity.def()
    }
}

impl Related<super::daily_opening_times::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyOpeningTimes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
