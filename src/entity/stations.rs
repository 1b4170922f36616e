use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub network_id: Uuid,
    pub owner_id: Uuid,
    pub site_id: Uuid,
    pub station_model_id: Uuid,
    pub name: String,
    pub date_start: DateTimeWithTimeZone,
    pub date_end: DateTimeWithTimeZone,
    pub description: String,
    pub auto_transmit: bool,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::networks::Entity",
        from = "Column::NetworkId",
        to = "super::networks::Column::Id"
    )]
    Network,
    #[sea_orm(
        belongs_to = "super::entities::Entity",
        from = "Column::OwnerId",
        to = "super::entities::Column::Id"
    )]
    Owner,
    #[sea_orm(
        belongs_to = "super::sites::Entity",
        from = "Column::SiteId",
        to = "super::sites::Column::Id"
    )]
    Site,
    #[sea_orm(
        belongs_to = "super::station_models::Entity",
        from = "Column::StationModelId",
        to = "super::station_models::Column::Id"
    )]
    StationModel,
    #[sea_orm(has_many = "super::sensors::Entity")]
    Sensors,
    #[sea_orm(has_many = "super::archives::Entity")]
    Archives,
}

impl Related<super::networks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Network.def()
    }
}

impl Related<super::entities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::sites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl Related<super::station_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationModel.def()
    }
}

impl Related<super::sensors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensors.def()
    }
}

impl Related<super::archives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Archives.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
