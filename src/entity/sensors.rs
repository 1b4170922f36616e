use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sensors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub station_id: Uuid,
    pub instrument_model_id: Uuid,
    pub description: String,
    pub date_start: DateTimeWithTimeZone,
    pub date_end: DateTimeWithTimeZone,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// A sensor is active while its deployment window is still open:
    /// `date_end` strictly after the evaluation instant. Never stored.
    #[must_use]
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.date_end.with_timezone(&Utc) > at
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stations::Entity",
        from = "Column::StationId",
        to = "super::stations::Column::Id"
    )]
    Station,
    #[sea_orm(
        belongs_to = "super::instrument_models::Entity",
        from = "Column::InstrumentModelId",
        to = "super::instrument_models::Column::Id"
    )]
    InstrumentModel,
}

impl Related<super::stations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::instrument_models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstrumentModel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
