use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::instrument_models::Entity")]
    InstrumentModels,
    #[sea_orm(has_many = "super::station_models::Entity")]
    StationModels,
}

impl Related<super::instrument_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstrumentModels.def()
    }
}

impl Related<super::station_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StationModels.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
