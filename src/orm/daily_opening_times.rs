use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "daily_opening_times")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub service_hours_id: i32,
    /// 0 = Monday .. 6 = Sunday
    pub day_from: i32,
    pub day_to: Option<i32>,
    pub from_time: Time,
    pub to_time: Time,
    pub order_number: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_hours::Entity",
        from = "Column::ServiceHoursId",
        to = "super::service_hours::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    ServiceHours,
}

impl Related<super::service_hours::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceHours.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
