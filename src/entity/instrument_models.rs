use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "instrument_models")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub reading_type: String,
    pub sensor_type: String,
    pub precision: String,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brands::Entity",
        from = "Column::BrandId",
        to = "super::brands::Column::Id"
    )]
    Brand,
    #[sea_orm(has_many = "super::sensors::Entity")]
    Sensors,
    #[sea_orm(has_many = "super::station_model_instruments::Entity")]
    StationModelInstruments,
}

impl Related<super::brands::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::sensors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sensors.def()
    }
}

impl Related<super::station_models::Entity> for Entity {
    fn to() -> RelationDef {
        super::station_model_instruments::Relation::StationModel.def()
    }

    fn via() -> Option<RelationDef> {
        Some(
            super::station_model_instruments::Relation::InstrumentModel
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
