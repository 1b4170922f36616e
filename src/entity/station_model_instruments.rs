use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "station_model_instruments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub station_model_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub instrument_model_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station_models::Entity",
        from = "Column::StationModelId",
        to = "super::station_models::Column::Id"
    )]
    StationModel,
    #[sea_orm(
        belongs_to = "super::instrument_models::Entity",
        from = "Column::InstrumentModelId",
        to = "super::instrument_models::Column::Id"
    )]
    InstrumentModel,
}

impl Related<super::station_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationModel.def()
    }
}

impl Related<super::instrument_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstrumentModel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
