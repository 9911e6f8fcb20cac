//! Ordered links between service roots and service channel roots

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "service_channel_connections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_root_id: i32,
    pub channel_root_id: i32,
    /// Combined order from before the split, kept for the split job
    pub legacy_order_number: Option<i32>,
    /// Position of the channel among the service's channels
    pub service_order_number: Option<i32>,
    /// Position of the service among the channel's services
    pub channel_order_number: Option<i32>,
    pub created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::roots::Entity",
        from = "Column::ServiceRootId",
        to = "super::roots::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Service,
    #[sea_orm(
        belongs_to = "super::roots::Entity",
        from = "Column::ChannelRootId",
        to = "super::roots::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Channel,
}

impl ActiveModelBehavior for ActiveModel {}
