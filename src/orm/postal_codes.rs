//! Postal codes with the center coordinate of their area

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Outcome of the last coordinate lookup for a postal code
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum CoordinateState {
    #[sea_orm(string_value = "not_fetched")]
    NotFetched,
    #[sea_orm(string_value = "ok")]
    Ok,
    /// The service answered without this postal code
    #[sea_orm(string_value = "not_received")]
    NotReceived,
    #[sea_orm(string_value = "wrong_format")]
    WrongFormat,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "postal_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub municipality_code: Option<String>,
    /// EPSG:3067 easting in meters
    pub center_x: Option<f64>,
    /// EPSG:3067 northing in meters
    pub center_y: Option<f64>,
    pub coordinate_state: CoordinateState,
    pub modified: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
