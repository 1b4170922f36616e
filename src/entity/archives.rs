use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "archives")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub station_id: Uuid,
    pub site_id: Uuid,
    pub date: DateTimeWithTimeZone,
    pub interval_sec: i32,
    pub units: String,
    pub temperature: Decimal,
    pub temperature2: Decimal,
    pub humidity: i16,
    pub dewpoint: Decimal,
    pub windchill: Decimal,
    pub heatindex: Decimal,
    pub pressure: Decimal,
    pub wind_direction: Decimal,
    pub wind: Decimal,
    pub wind_gust: Decimal,
    pub wind_gust_dir: Decimal,
    pub wind_2min: Decimal,
    pub wind_10min: Decimal,
    pub rain: Decimal,
    pub rain_rate: Decimal,
    pub uv_radiation: Decimal,
    pub solar_radiation: i16,
    pub et: Decimal,
    pub created_at: Option<DateTimeWithTimeZone>,
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
        belongs_to = "super::sites::Entity",
        from = "Column::SiteId",
        to = "super::sites::Column::Id"
    )]
    Site,
}

impl Related<super::stations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::sites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Site.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
